//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula las queries SQL de un agregado. Las
//! transiciones multi-tabla viven en el repositorio de asignaciones.

pub mod job_repository;
pub mod assignment_repository;
pub mod inspection_repository;
