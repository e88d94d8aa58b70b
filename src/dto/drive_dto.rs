//! DTOs del drive tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::drive::{ActiveDriveInfo, DriveStats, DriveSummary};

/// Request para iniciar el rastreo de un drive
#[derive(Debug, Deserialize)]
pub struct StartDriveRequest {
    pub assignment_id: Uuid,
    pub job_id: Uuid,
    pub driver_id: Uuid,
}

/// Un fix de posición reportado por el dispositivo
#[derive(Debug, Deserialize)]
pub struct PositionUpdateRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Timestamp del fix; si falta se usa la hora del servidor
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response de estadísticas del drive
#[derive(Debug, Serialize)]
pub struct DriveStatsResponse {
    pub elapsed_seconds: i64,
    pub total_distance_meters: f64,
    pub position_count: usize,
}

impl From<DriveStats> for DriveStatsResponse {
    fn from(stats: DriveStats) -> Self {
        Self {
            elapsed_seconds: stats.elapsed_seconds,
            total_distance_meters: stats.total_distance_meters,
            position_count: stats.position_count,
        }
    }
}

/// Response del drive activo
#[derive(Debug, Serialize)]
pub struct ActiveDriveResponse {
    pub job_id: Uuid,
    pub assignment_id: Uuid,
    pub driver_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl From<ActiveDriveInfo> for ActiveDriveResponse {
    fn from(info: ActiveDriveInfo) -> Self {
        Self {
            job_id: info.job_id,
            assignment_id: info.assignment_id,
            driver_id: info.driver_id,
            started_at: info.started_at,
        }
    }
}

/// Response del resumen final de un drive
#[derive(Debug, Serialize)]
pub struct DriveSummaryResponse {
    pub job_id: Uuid,
    pub assignment_id: Uuid,
    pub driver_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub total_distance_meters: f64,
    pub position_count: usize,
}

impl From<DriveSummary> for DriveSummaryResponse {
    fn from(summary: DriveSummary) -> Self {
        Self {
            job_id: summary.job_id,
            assignment_id: summary.assignment_id,
            driver_id: summary.driver_id,
            started_at: summary.started_at,
            ended_at: summary.ended_at,
            elapsed_seconds: summary.elapsed_seconds,
            total_distance_meters: summary.total_distance_meters,
            position_count: summary.position_count,
        }
    }
}
