//! Routers de la API
//!
//! Las rutas públicas (registro, login, catálogo de vehículos) quedan
//! fuera del middleware de autenticación; todo lo demás exige Bearer
//! token y los handlers chequean el rol antes de invocar al servicio.

pub mod auth_routes;
pub mod client_routes;
pub mod report_routes;
pub mod reservation_routes;
pub mod vehicle_routes;

use axum::{middleware, routing::get, Router};

use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    // Sin CORS_ORIGINS configurado se permite cualquier origen (desarrollo)
    let cors = if state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    let public = Router::new()
        .nest("/auth", auth_routes::router())
        .route("/vehicle", get(vehicle_routes::list_vehicles))
        .route("/vehicle/:id", get(vehicle_routes::get_vehicle));

    let protected = Router::new()
        .nest("/client", client_routes::router())
        .nest("/reservation", reservation_routes::router())
        .nest("/report", report_routes::router())
        .merge(vehicle_routes::admin_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
