//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El DriveTracker vive aquí como singleton
//! del proceso: solo puede haber un drive rastreado a la vez y ningún
//! handler lo muta directamente, siempre a través de sus métodos.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::drive_tracker::DriveTracker;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub tracker: Arc<DriveTracker>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let tracker = Arc::new(DriveTracker::new(config.drive_jitter_floor_meters));
        Self {
            pool,
            config,
            tracker,
        }
    }
}
