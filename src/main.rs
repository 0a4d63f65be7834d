mod config;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Rental - API de alquiler de vehículos");
    info!("================================================");

    let env_config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => {
            info!("✅ Base de datos conectada exitosamente");
            pool
        }
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    database::run_migrations(&pool).await?;
    info!("✅ Migraciones aplicadas");

    let addr: SocketAddr = env_config.server_url().parse()?;
    let app_state = AppState::new(pool, env_config);
    let app = routes::create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("🔑 Auth:");
    info!("   POST /auth/register - Registrar cliente");
    info!("   POST /auth/login - Login");
    info!("👤 Client (ADMIN):");
    info!("   GET  /client - Listar clientes");
    info!("   GET  /client/:id - Obtener cliente");
    info!("   PUT  /client/:id - Actualizar cliente");
    info!("   DELETE /client/:id - Eliminar cliente");
    info!("🚗 Vehicle:");
    info!("   GET  /vehicle - Listar vehículos (público)");
    info!("   GET  /vehicle/:id - Obtener vehículo (público)");
    info!("   POST /vehicle - Crear vehículo (ADMIN)");
    info!("   PUT  /vehicle/:id - Actualizar vehículo (ADMIN)");
    info!("   DELETE /vehicle/:id - Eliminar vehículo (ADMIN)");
    info!("📅 Reservation:");
    info!("   POST /reservation - Crear reserva (autenticado)");
    info!("   GET  /reservation - Listar reservas (ADMIN)");
    info!("   GET  /reservation/:id - Obtener reserva (ADMIN)");
    info!("   PUT  /reservation/:id - Actualizar reserva (ADMIN)");
    info!("   DELETE /reservation/:id - Eliminar reserva (ADMIN)");
    info!("📊 Report (ADMIN):");
    info!("   GET  /report/clients - Relatório de clientes");
    info!("   GET  /report/vehicles - Relatório de veículos");
    info!("   GET  /report/reservations - Relatório de reservas");
    info!("   GET  /report/reservations/active - Reservas activas");
    info!("   GET  /report/reservations/per-vehicle - Reservas por vehículo");
    info!("   GET  /report/revenue?start&end - Faturamento del período");
    info!("   GET  /report/invoice/:client_id - Nota fiscal (autenticado)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("No se pudo instalar el handler de Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("No se pudo instalar el handler de SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C recibido, apagando"),
        _ = terminate => info!("🛑 SIGTERM recibido, apagando"),
    }
}
