use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::Vehicle;

// Request para crear o actualizar un vehículo (el PUT reemplaza todo)
#[derive(Debug, Deserialize, Validate)]
pub struct VehicleRequest {
    #[validate(length(min = 5, max = 20))]
    pub plate: String,

    #[validate(length(max = 100))]
    pub brand: Option<String>,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    #[validate(length(max = 10))]
    pub year: Option<String>,

    #[validate(length(max = 50))]
    pub color: Option<String>,

    #[validate(length(max = 300))]
    pub description: Option<String>,

    #[validate(url)]
    pub img_url: Option<String>,

    pub daily_value: Decimal,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
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

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            plate: vehicle.plate,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            color: vehicle.color,
            description: vehicle.description,
            img_url: vehicle.img_url,
            daily_value: vehicle.daily_value,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}
