use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::reservation::Reservation;
use crate::utils::errors::AppError;

// Request para crear o actualizar una reserva
#[derive(Debug, Deserialize)]
pub struct ReservationRequest {
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ReservationRequest {
    /// El intervalo debe ser no vacío antes de llegar al chequeo de solape
    pub fn validate_period(&self) -> Result<(), AppError> {
        if self.end_date <= self.start_date {
            return Err(AppError::BadRequest(
                "A data de término deve ser posterior à data de início".to_string(),
            ));
        }
        Ok(())
    }
}

// Response de reserva: referencias por id, no por valor
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            client_id: reservation.client_id,
            vehicle_id: reservation.vehicle_id,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_period_is_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 7, 10, 0, 0, 0).unwrap();
        let request = ReservationRequest {
            client_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            start_date: start,
            end_date: start,
        };
        assert!(request.validate_period().is_err());
    }
}
