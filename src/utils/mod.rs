//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, JWT
//! y fechas de los reportes.

pub mod errors;
pub mod jwt;
pub mod periods;
