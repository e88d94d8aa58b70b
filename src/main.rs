mod config;
mod state;
mod database;
mod services;
mod utils;
mod models;
mod middleware;
mod controllers;
mod repositories;
mod routes;
mod dto;

use anyhow::Result;
use axum::{routing::get, response::Json, Router};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;
use serde_json::json;

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Dealer Dispatch - Marketplace de entregas dealer/driver");
    info!("==========================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Crear el estado compartido con el drive tracker singleton
    let config = EnvironmentConfig::default();
    let app_state = AppState::new(pool, config.clone());

    // Loggear el progreso del drive activo desde el canal de estadísticas
    let mut drive_updates = app_state.tracker.subscribe();
    tokio::spawn(async move {
        while let Ok(stats) = drive_updates.recv().await {
            info!(
                "📍 Drive activo: {:.0} m recorridos en {} s ({} fixes)",
                stats.total_distance_meters, stats.elapsed_seconds, stats.position_count
            );
        }
    });

    // CORS: permisivo en desarrollo, lista de orígenes en producción
    let cors = if config.is_production() {
        cors_middleware_with_origins(&config.cors_origins)
    } else {
        cors_middleware()
    };

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/job", routes::job_routes::create_job_router())
        .nest("/api/drive", routes::drive_routes::create_drive_router())
        .layer(cors)
        .with_state(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📋 Endpoints - Job:");
    info!("   POST /api/job - Crear job");
    info!("   GET  /api/job - Listar jobs");
    info!("   GET  /api/job/:id - Obtener job");
    info!("   POST /api/job/:id/accept - Aceptar job (driver)");
    info!("   POST /api/job/:id/start - Iniciar drive con inspección pre-drive");
    info!("   POST /api/job/:id/complete - Completar con inspección post-drive");
    info!("   POST /api/job/:id/cancel - Cancelar job (dealer)");
    info!("   GET  /api/job/:id/inspections - Inspecciones del job");
    info!("🚗 Endpoints - Drive tracking:");
    info!("   POST /api/drive/start - Iniciar rastreo");
    info!("   POST /api/drive/position - Registrar fix GPS");
    info!("   GET  /api/drive/stats - Estadísticas actuales");
    info!("   GET  /api/drive/active - Drive activo");
    info!("   POST /api/drive/complete - Terminar rastreo");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                anyhow::Error::from(e)
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Dealer Dispatch API funcionando correctamente",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
