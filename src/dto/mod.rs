//! DTOs de la API
//!
//! Requests y responses serializables de los endpoints HTTP.

pub mod job_dto;
pub mod drive_dto;

use serde::Serialize;

/// Envoltorio estándar de las respuestas de mutación
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
