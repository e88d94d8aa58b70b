//! Controllers de la API
//!
//! Orquestan repositorios y servicios para cada operación de la API.

pub mod job_controller;
pub mod drive_controller;
