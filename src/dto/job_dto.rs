//! DTOs de jobs, asignaciones e inspecciones

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::assignment::Assignment;
use crate::models::inspection::VehicleInspection;
use crate::models::job::Job;

/// Request para crear un job
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    pub dealer_id: Uuid,
    pub created_by: Option<Uuid>,

    /// delivery | swap | parts | service
    pub job_type: String,

    #[validate(length(min = 5, max = 500))]
    pub pickup_address: String,
    pub pickup_lat: Option<f64>,
    pub pickup_lng: Option<f64>,

    #[validate(length(min = 5, max = 500))]
    pub delivery_address: String,
    pub delivery_lat: Option<f64>,
    pub delivery_lng: Option<f64>,

    #[validate(range(min = 1900, max = 2030))]
    pub vehicle_year: Option<i32>,

    #[validate(length(min = 1, max = 100))]
    pub vehicle_make: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub vehicle_model: Option<String>,

    pub vin: Option<String>,
    pub transmission: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,

    pub distance_estimate_km: Option<f64>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Filtros de listado de jobs
#[derive(Debug, Deserialize)]
pub struct JobFilters {
    pub status: Option<String>,
    pub dealer_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request para aceptar un job
#[derive(Debug, Deserialize)]
pub struct AcceptJobRequest {
    pub driver_id: Uuid,
}

/// Request para iniciar el drive de un job
#[derive(Debug, Deserialize)]
pub struct StartJobRequest {
    pub driver_id: Uuid,
    pub odometer_km: Option<f64>,
    /// Fotos de inspección pre-drive, en base64
    pub photos: Vec<String>,
}

/// Request para completar un job
#[derive(Debug, Deserialize)]
pub struct CompleteJobRequest {
    pub driver_id: Uuid,
    pub odometer_km: Option<f64>,
    pub dealer_plate: Option<String>,
    /// Foto de prueba de entrega, en base64
    pub proof_photo: Option<String>,
}

/// Response de job
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub job_type: String,
    pub status: String,
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
    pub distance_estimate_km: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            dealer_id: job.dealer_id,
            job_type: job.job_type.as_str().to_string(),
            status: job.status.to_string(),
            pickup_address: job.pickup_address,
            pickup_lat: job.pickup_lat,
            pickup_lng: job.pickup_lng,
            delivery_address: job.delivery_address,
            delivery_lat: job.delivery_lat,
            delivery_lng: job.delivery_lng,
            vehicle_year: job.vehicle_year,
            vehicle_make: job.vehicle_make,
            vehicle_model: job.vehicle_model,
            vin: job.vin,
            transmission: job.transmission,
            customer_name: job.customer_name,
            customer_phone: job.customer_phone,
            distance_estimate_km: job.distance_estimate_km.map(|d| d.to_string()),
            notes: job.notes,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Response de asignación
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub driver_id: Uuid,
    pub accepted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub odometer_start_km: Option<String>,
    pub odometer_end_km: Option<String>,
    pub in_progress: bool,
}

impl From<Assignment> for AssignmentResponse {
    fn from(assignment: Assignment) -> Self {
        let in_progress = assignment.is_in_progress();
        Self {
            id: assignment.id,
            job_id: assignment.job_id,
            driver_id: assignment.driver_id,
            accepted_at: assignment.accepted_at,
            started_at: assignment.started_at,
            ended_at: assignment.ended_at,
            cancelled_at: assignment.cancelled_at,
            odometer_start_km: assignment.odometer_start_km.map(|d| d.to_string()),
            odometer_end_km: assignment.odometer_end_km.map(|d| d.to_string()),
            in_progress,
        }
    }
}

/// Response de inspección
#[derive(Debug, Serialize)]
pub struct InspectionResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub assignment_id: Uuid,
    pub inspection_type: String,
    pub photo_urls: Vec<String>,
    pub odometer_km: Option<String>,
    pub dealer_plate: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleInspection> for InspectionResponse {
    fn from(inspection: VehicleInspection) -> Self {
        Self {
            id: inspection.id,
            job_id: inspection.job_id,
            assignment_id: inspection.assignment_id,
            inspection_type: inspection.inspection_type.as_str().to_string(),
            photo_urls: inspection.photo_urls,
            odometer_km: inspection.odometer_km.map(|d| d.to_string()),
            dealer_plate: inspection.dealer_plate,
            created_at: inspection.created_at,
        }
    }
}

/// Response combinado de una transición job + assignment
#[derive(Debug, Serialize)]
pub struct JobTransitionResponse {
    pub job: JobResponse,
    pub assignment: AssignmentResponse,
}

/// Response de una transición con inspección persistida
#[derive(Debug, Serialize)]
pub struct JobTransitionWithInspectionResponse {
    pub job: JobResponse,
    pub assignment: AssignmentResponse,
    pub inspection: InspectionResponse,
}
