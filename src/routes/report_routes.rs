//! Endpoints de reportes
//!
//! Los reportes devuelven listas de líneas ya formateadas; lista vacía
//! responde 204 No Content. El endpoint de facturación parsea el período
//! `dd-MM-yyyy` y responde el texto con fechas `dd/MM/yyyy`: ambos
//! formatos son superficie de compatibilidad.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::services::client_service::ClientService;
use crate::services::reservation_service::ReservationService;
use crate::services::vehicle_service::VehicleService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::periods::{day_end, day_start, format_output_date, parse_period_date};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(client_report))
        .route("/vehicles", get(vehicle_report))
        .route("/reservations", get(reservation_report))
        .route("/reservations/active", get(active_reservations_report))
        .route("/reservations/per-vehicle", get(reservations_per_vehicle_report))
        .route("/invoice/:client_id", get(generate_invoice))
        .route("/revenue", get(revenue))
}

fn report_response(lines: Vec<String>) -> Response {
    if lines.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(lines).into_response()
    }
}

async fn client_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, AppError> {
    user.require_admin()?;
    let service = ClientService::new(state.pool.clone());
    Ok(report_response(service.customer_list().await?))
}

async fn vehicle_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, AppError> {
    user.require_admin()?;
    let service = VehicleService::new(state.pool.clone());
    Ok(report_response(service.vehicle_list().await?))
}

async fn reservation_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, AppError> {
    user.require_admin()?;
    let service = ReservationService::new(state.pool.clone());
    Ok(report_response(service.reservation_list().await?))
}

async fn active_reservations_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, AppError> {
    user.require_admin()?;
    let service = ReservationService::new(state.pool.clone());
    Ok(report_response(service.active_reservations_report().await?))
}

async fn reservations_per_vehicle_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, AppError> {
    user.require_admin()?;
    let service = ReservationService::new(state.pool.clone());
    Ok(report_response(
        service.reservations_per_vehicle_report().await?,
    ))
}

/// Nota fiscal: permitida para ADMIN y CLIENT
async fn generate_invoice(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Path(client_id): Path<Uuid>,
) -> Result<String, AppError> {
    let service = ReservationService::new(state.pool.clone());
    service.generate_invoice(client_id).await
}

#[derive(Debug, Deserialize)]
struct RevenueParams {
    start: String,
    end: String,
}

async fn revenue(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<RevenueParams>,
) -> Result<String, AppError> {
    user.require_admin()?;

    // El período llega como dd-MM-yyyy y se expande a los límites del día
    let start_date = parse_period_date(&params.start)?;
    let end_date = parse_period_date(&params.end)?;

    let period_start = day_start(start_date);
    let period_end = day_end(end_date)?;

    let service = ReservationService::new(state.pool.clone());
    let total = service.revenue_in_period(period_start, period_end).await?;

    Ok(format!(
        "Faturamento do período de {} à {}: R$ {:.2}",
        format_output_date(period_start),
        format_output_date(period_end),
        total
    ))
}
