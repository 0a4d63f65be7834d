//! Middleware de autenticación
//!
//! Valida el Bearer token y deja al usuario autenticado en las
//! extensiones del request. Los chequeos de rol corren en cada handler
//! antes de invocar al servicio, espejo de las reglas por endpoint.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::client::ROLE_ADMIN;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

/// Usuario autenticado extraído del JWT
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub client_id: Uuid,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Gate de capacidad: la operación exige rol ADMIN
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Operação permitida apenas para ADMIN".to_string(),
            ))
        }
    }
}

/// Middleware de autenticación por Bearer token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token ausente".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Token malformado".to_string()))?;

    let claims = verify_token(token, &JwtConfig::from(&state.config))?;

    let client_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser {
        client_id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin_rejects_client_role() {
        let user = AuthenticatedUser {
            client_id: Uuid::new_v4(),
            role: "CLIENT".to_string(),
        };
        assert!(user.require_admin().is_err());

        let admin = AuthenticatedUser {
            client_id: Uuid::new_v4(),
            role: "ADMIN".to_string(),
        };
        assert!(admin.require_admin().is_ok());
    }
}
