//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use crate::services::drive_tracker::DEFAULT_JITTER_FLOOR_METERS;

/// Placas de dealer disponibles si DEALER_PLATES no está configurado
const DEFAULT_DEALER_PLATES: &str = "X,Y,Z";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // Set enumerado de placas de dealer válidas para completar un job
    pub dealer_plates: Vec<String>,
    // Object storage para fotos de inspección
    pub storage_base_url: String,
    pub storage_bucket: String,
    pub storage_api_key: Option<String>,
    // Umbral de jitter GPS en metros para el drive tracker
    pub drive_jitter_floor_meters: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            port: env::var("PORT")
                .expect("PORT must be set")
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").expect("HOST must be set"),
            cors_origins: env::var("CORS_ORIGINS")
                .expect("CORS_ORIGINS must be set")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            dealer_plates: env::var("DEALER_PLATES")
                .unwrap_or_else(|_| DEFAULT_DEALER_PLATES.to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            storage_base_url: env::var("STORAGE_BASE_URL").expect("STORAGE_BASE_URL must be set"),
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "inspection-photos".to_string()),
            storage_api_key: env::var("STORAGE_API_KEY").ok(),
            drive_jitter_floor_meters: env::var("DRIVE_JITTER_FLOOR_METERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JITTER_FLOOR_METERS),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
