use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::page::{Page, PaginationParams};
use crate::dto::vehicle_dto::{VehicleRequest, VehicleResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::services::vehicle_service::VehicleService;
use crate::state::AppState;
use crate::utils::errors::AppError;

// Las mutaciones de flota son solo ADMIN; los GET son públicos para que
// cualquier visitante pueda navegar los vehículos (ver routes::create_app)
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/vehicle", post(create_vehicle))
        .route("/vehicle/:id", put(update_vehicle))
        .route("/vehicle/:id", delete(delete_vehicle))
}

pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<VehicleResponse>>, AppError> {
    let service = VehicleService::new(state.pool.clone());
    Ok(Json(service.find_all(&params).await?))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let service = VehicleService::new(state.pool.clone());
    Ok(Json(service.find_by_id(id).await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<VehicleRequest>,
) -> Result<(StatusCode, Json<VehicleResponse>), AppError> {
    user.require_admin()?;
    request.validate()?;
    let service = VehicleService::new(state.pool.clone());
    let response = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<VehicleRequest>,
) -> Result<Json<VehicleResponse>, AppError> {
    user.require_admin()?;
    request.validate()?;
    let service = VehicleService::new(state.pool.clone());
    Ok(Json(service.update(id, request).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    let service = VehicleService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
