//! Modelo de Vehicle
//!
//! Mapea exactamente a la tabla `vehicle` del schema PostgreSQL.
//! `daily_value` es NUMERIC: los importes se manejan siempre como Decimal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub img_url: Option<String>,
    pub daily_value: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
