//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar, más los tipos
//! en memoria del drive activo.

pub mod job;
pub mod assignment;
pub mod inspection;
pub mod drive;
