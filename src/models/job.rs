//! Modelo de Job
//!
//! Este módulo contiene el struct Job y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

/// Estado del job - mapea al ENUM job_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Representación textual usada en la base de datos y en la API
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Assigned => "assigned",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(JobStatus::Open),
            "assigned" => Ok(JobStatus::Assigned),
            "in_progress" => Ok(JobStatus::InProgress),
            "completed" => Ok(JobStatus::Completed),
            "cancelled" => Ok(JobStatus::Cancelled),
            other => Err(format!("unknown job status '{}'", other)),
        }
    }
}

/// Tipo de job - mapea al ENUM job_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "job_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Delivery,
    Swap,
    Parts,
    Service,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Delivery => "delivery",
            JobType::Swap => "swap",
            JobType::Parts => "parts",
            JobType::Service => "service",
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(JobType::Delivery),
            "swap" => Ok(JobType::Swap),
            "parts" => Ok(JobType::Parts),
            "service" => Ok(JobType::Service),
            other => Err(format!("unknown job type '{}'", other)),
        }
    }
}

/// Datos validados para insertar un job nuevo
#[derive(Debug, Clone)]
pub struct NewJob {
    pub dealer_id: Uuid,
    pub created_by: Option<Uuid>,
    pub job_type: JobType,
    pub pickup_address: String,
    pub pickup_lat: Option<f64>,
    pub pickup_lng: Option<f64>,
    pub delivery_address: String,
    pub delivery_lat: Option<f64>,
    pub delivery_lng: Option<f64>,
    pub vehicle_year: Option<i32>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vin: Option<String>,
    pub transmission: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub distance_estimate_km: Option<Decimal>,
    pub notes: Option<String>,
}

/// Job principal - mapea exactamente a la tabla jobs del schema simplificado
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub created_by: Option<Uuid>,
    pub job_type: JobType,
    pub status: JobStatus,
    pub pickup_address: String,
    pub pickup_lat: Option<f64>,
    pub pickup_lng: Option<f64>,
    pub delivery_address: String,
    pub delivery_lat: Option<f64>,
    pub delivery_lng: Option<f64>,
    pub vehicle_year: Option<i32>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vin: Option<String>,
    pub transmission: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub distance_estimate_km: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
