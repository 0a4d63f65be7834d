use serde::{Deserialize, Serialize};
use validator::Validate;

// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

// Response de login con el token JWT
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}
