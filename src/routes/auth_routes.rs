use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::client_dto::{ClientResponse, CreateClientRequest};
use crate::services::auth_service::AuthService;
use crate::services::client_service::ClientService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::JwtConfig;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Registro público: el cliente nace con rol CLIENT
async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    request.validate()?;
    let service = ClientService::new(state.pool.clone());
    let response = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    request.validate()?;
    let service = AuthService::new(state.pool.clone(), JwtConfig::from(&state.config));
    let response = service.login(request).await?;
    Ok(Json(response))
}
