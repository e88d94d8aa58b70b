//! Modelos del drive activo
//!
//! Estos tipos existen solo en memoria: el drive activo pertenece al
//! DriveTracker y se pierde si el proceso termina, salvo lo que ya fue
//! persistido en la asignación.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Una posición GPS observada
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PositionFix {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Estadísticas publicadas a los suscriptores en cada fix
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DriveStats {
    pub elapsed_seconds: i64,
    pub total_distance_meters: f64,
    pub position_count: usize,
}

/// El drive actualmente rastreado - singleton a nivel de proceso
#[derive(Debug, Clone)]
pub struct ActiveDrive {
    pub job_id: Uuid,
    pub assignment_id: Uuid,
    pub driver_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub positions: Vec<PositionFix>,
    pub total_distance_meters: f64,
    // Última posición que contribuyó a la distancia. Los fixes por debajo
    // del umbral de jitter no mueven este ancla, así el movimiento lento
    // real se acumula igual una vez que supera el umbral.
    pub anchor: Option<(f64, f64)>,
}

impl ActiveDrive {
    pub fn new(job_id: Uuid, assignment_id: Uuid, driver_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            job_id,
            assignment_id,
            driver_id,
            started_at,
            positions: Vec::new(),
            total_distance_meters: 0.0,
            anchor: None,
        }
    }
}

/// Descriptor del drive activo para componentes que llegan tarde
#[derive(Debug, Clone, Serialize)]
pub struct ActiveDriveInfo {
    pub job_id: Uuid,
    pub assignment_id: Uuid,
    pub driver_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl From<&ActiveDrive> for ActiveDriveInfo {
    fn from(drive: &ActiveDrive) -> Self {
        Self {
            job_id: drive.job_id,
            assignment_id: drive.assignment_id,
            driver_id: drive.driver_id,
            started_at: drive.started_at,
        }
    }
}

/// Resumen final devuelto por complete_drive para su persistencia
#[derive(Debug, Clone, Serialize)]
pub struct DriveSummary {
    pub job_id: Uuid,
    pub assignment_id: Uuid,
    pub driver_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub total_distance_meters: f64,
    pub position_count: usize,
}
