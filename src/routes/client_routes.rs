use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::client_dto::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::dto::page::{Page, PaginationParams};
use crate::middleware::auth::AuthenticatedUser;
use crate::services::client_service::ClientService;
use crate::state::AppState;
use crate::utils::errors::AppError;

// Todo el CRUD de clientes es solo ADMIN
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients))
        .route("/", post(create_client))
        .route("/:id", get(get_client))
        .route("/:id", put(update_client))
        .route("/:id", delete(delete_client))
}

async fn list_clients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<ClientResponse>>, AppError> {
    user.require_admin()?;
    let service = ClientService::new(state.pool.clone());
    Ok(Json(service.find_all(&params).await?))
}

async fn get_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientResponse>, AppError> {
    user.require_admin()?;
    let service = ClientService::new(state.pool.clone());
    Ok(Json(service.find_by_id(id).await?))
}

async fn create_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    user.require_admin()?;
    request.validate()?;
    let service = ClientService::new(state.pool.clone());
    let response = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    user.require_admin()?;
    request.validate()?;
    let service = ClientService::new(state.pool.clone());
    Ok(Json(service.update(id, request).await?))
}

async fn delete_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;
    let service = ClientService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
