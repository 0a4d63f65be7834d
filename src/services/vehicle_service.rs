//! Servicio de vehículos
//!
//! CRUD de la flota más el reporte de listado.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::page::{Page, PaginationParams};
use crate::dto::vehicle_dto::{VehicleRequest, VehicleResponse};
use crate::models::vehicle::Vehicle;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct VehicleService {
    vehicles: VehicleRepository,
}

impl VehicleService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn find_all(
        &self,
        params: &PaginationParams,
    ) -> Result<Page<VehicleResponse>, AppError> {
        let (vehicles, total) = self.vehicles.find_all_paged(params).await?;
        let content = vehicles.into_iter().map(Into::into).collect();
        Ok(Page::new(content, params, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Veículo não encontrado".to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn create(&self, request: VehicleRequest) -> Result<VehicleResponse, AppError> {
        validate_daily_value(request.daily_value)?;

        if self.vehicles.plate_exists(&request.plate, None).await? {
            return Err(AppError::Conflict("Placa já cadastrada".to_string()));
        }

        let vehicle = self
            .vehicles
            .create(
                request.plate,
                request.brand,
                request.model,
                request.year,
                request.color,
                request.description,
                request.img_url,
                request.daily_value,
            )
            .await?;

        tracing::info!("✅ Vehículo creado: {} ({})", vehicle.id, vehicle.plate);
        Ok(vehicle.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: VehicleRequest,
    ) -> Result<VehicleResponse, AppError> {
        validate_daily_value(request.daily_value)?;

        if self.vehicles.plate_exists(&request.plate, Some(id)).await? {
            return Err(AppError::Conflict("Placa já cadastrada".to_string()));
        }

        let vehicle = self
            .vehicles
            .update(
                id,
                request.plate,
                request.brand,
                request.model,
                request.year,
                request.color,
                request.description,
                request.img_url,
                request.daily_value,
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Veículo não encontrado: {}", id)))?;

        tracing::info!("✅ Vehículo actualizado: {}", vehicle.id);
        Ok(vehicle.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.vehicles.exists_by_id(id).await? {
            return Err(AppError::NotFound(format!(
                "Veículo não encontrado - ID: {}",
                id
            )));
        }

        self.vehicles.delete(id).await?;
        tracing::info!("🗑️ Vehículo eliminado: {}", id);
        Ok(())
    }

    /// Reporte: una línea por vehículo de la flota
    pub async fn vehicle_list(&self) -> Result<Vec<String>, AppError> {
        let vehicles = self.vehicles.find_all().await?;
        Ok(vehicles.iter().map(format_vehicle_line).collect())
    }
}

fn validate_daily_value(value: Decimal) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "O valor da diária não pode ser negativo".to_string(),
        ));
    }
    Ok(())
}

/// Campos opcionales ausentes se imprimen como "N/A" literal
fn safe(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn format_vehicle_line(vehicle: &Vehicle) -> String {
    format!(
        "Carro - Placa: {}  - Modelo: {} - Marca: {} - Cor: {} - Ano: {}",
        vehicle.plate,
        safe(&vehicle.model),
        safe(&vehicle.brand),
        safe(&vehicle.color),
        safe(&vehicle.year)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_vehicle_line_renders_missing_fields_as_na() {
        let vehicle = Vehicle {
            id: Uuid::nil(),
            plate: "ABC1D23".to_string(),
            brand: Some("Fiat".to_string()),
            model: Some("Uno".to_string()),
            year: None,
            color: None,
            description: None,
            img_url: None,
            daily_value: Decimal::from(120),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };

        let line = format_vehicle_line(&vehicle);
        assert_eq!(
            line,
            "Carro - Placa: ABC1D23  - Modelo: Uno - Marca: Fiat - Cor: N/A - Ano: N/A"
        );
    }

    #[test]
    fn test_negative_daily_value_is_rejected() {
        assert!(validate_daily_value(Decimal::from(-1)).is_err());
        assert!(validate_daily_value(Decimal::ZERO).is_ok());
    }
}
