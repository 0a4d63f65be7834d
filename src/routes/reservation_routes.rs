use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::dto::page::{Page, PaginationParams};
use crate::dto::reservation_dto::{ReservationRequest, ReservationResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::services::reservation_service::ReservationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations))
        .route("/", post(create_reservation))
        .route("/:id", get(get_reservation))
        .route("/:id", put(update_reservation))
        .route("/:id", delete(delete_reservation))
}

async fn list_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<ReservationResponse>>, AppError> {
    user.require_admin()?;
    let service = ReservationService::new(state.pool.clone());
    Ok(Json(service.find_all(&params).await?))
}

async fn get_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>, AppError> {
    user.require_admin()?;
    let service = ReservationService::new(state.pool.clone());
    Ok(Json(service.find_by_id(id).await?))
}

/// Crear reserva: cualquier usuario autenticado (ADMIN o CLIENT)
async fn create_reservation(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Json(request): Json<ReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let service = ReservationService::new(state.pool.clone());
    let response = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReservationRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    user.require_admin()?;
    let service = ReservationService::new(state.pool.clone());
    Ok(Json(service.update(id, request).await?))
}

async fn delete_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    let service = ReservationService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
