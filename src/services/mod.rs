//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. El núcleo
//! es el servicio de reservas: chequeo de conflictos de intervalo,
//! facturación por período, nota fiscal y reportes.

pub mod auth_service;
pub mod client_service;
pub mod reservation_service;
pub mod vehicle_service;
