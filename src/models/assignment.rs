//! Modelo de Assignment
//!
//! Una asignación vincula un driver con un job. Los timestamps se rellenan
//! secuencialmente: accepted_at en la aceptación, started_at al iniciar el
//! drive y ended_at al completarlo. La cancelación marca cancelled_at en
//! lugar de borrar la fila, para conservar el historial.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

/// Assignment principal - mapea exactamente a la tabla assignments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub job_id: Uuid,
    pub driver_id: Uuid,
    pub accepted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub odometer_start_km: Option<Decimal>,
    pub odometer_end_km: Option<Decimal>,
}

impl Assignment {
    /// Estado derivado: started_at presente y ended_at ausente
    pub fn is_in_progress(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }

    /// Una asignación activa no fue ni terminada ni cancelada
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none() && self.cancelled_at.is_none()
    }
}
