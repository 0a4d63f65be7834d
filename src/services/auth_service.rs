//! Servicio de autenticación
//!
//! Login por email + password (bcrypt) y emisión del JWT con el rol
//! del cliente. El registro reusa el alta de ClientService.

use sqlx::PgPool;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::repositories::client_repository::ClientRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthService {
    clients: ClientRepository,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_config: JwtConfig) -> Self {
        Self {
            clients: ClientRepository::new(pool),
            jwt_config,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let client = self
            .clients
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciais inválidas".to_string()))?;

        let valid = bcrypt::verify(&request.password, &client.password)
            .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))?;

        if !valid {
            tracing::warn!("❌ Login fallido para {}", request.email);
            return Err(AppError::Unauthorized("Credenciais inválidas".to_string()));
        }

        let token = generate_token(client.id, &client.role, &self.jwt_config)?;

        tracing::info!("✅ Login exitoso para {}", request.email);
        Ok(LoginResponse { token })
    }
}
