//! Utilidades del sistema
//!
//! Helpers de validación y el sistema de errores de la aplicación.

pub mod errors;
pub mod validation;
