//! Modelo de Reservation
//!
//! Mapea exactamente a la tabla `reservation` del schema PostgreSQL.
//! El intervalo [start_date, end_date) es semiabierto para el chequeo
//! de conflictos: reservas espalda con espalda no colisionan.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fila de reserva con los datos de cliente y vehículo ya unidos.
/// Es la proyección que consumen los reportes y la facturación.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationDetail {
    pub id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub client_name: Option<String>,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_year: Option<String>,
    pub vehicle_description: Option<String>,
    pub daily_value: Decimal,
}
