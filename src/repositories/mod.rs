//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula el SQL de su tabla sobre un PgPool.
//! La lógica de negocio vive en los servicios; acá solo queries.

pub mod client_repository;
pub mod reservation_repository;
pub mod vehicle_repository;
