//! Modelo de VehicleInspection
//!
//! Registro inmutable de evidencia fotográfica tomada antes (pre_drive)
//! o después (post_drive) de un drive. Insert-only: nunca se actualiza.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

/// Tipo de inspección - mapea al ENUM inspection_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "inspection_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InspectionType {
    PreDrive,
    PostDrive,
}

impl InspectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionType::PreDrive => "pre_drive",
            InspectionType::PostDrive => "post_drive",
        }
    }
}

/// VehicleInspection principal - mapea exactamente a la tabla vehicle_inspections
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleInspection {
    pub id: Uuid,
    pub job_id: Uuid,
    pub assignment_id: Uuid,
    pub inspection_type: InspectionType,
    pub photo_urls: Vec<String>,
    pub odometer_km: Option<Decimal>,
    pub dealer_plate: Option<String>,
    pub created_at: DateTime<Utc>,
}
