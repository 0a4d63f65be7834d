//! DTOs de la API
//!
//! Requests y responses que viajan por el HTTP layer. Los modelos de
//! persistencia nunca se serializan directamente hacia afuera.

pub mod auth_dto;
pub mod client_dto;
pub mod page;
pub mod reservation_dto;
pub mod vehicle_dto;
