//! Controller de jobs
//!
//! Orquesta las transiciones del ciclo de vida: valida con la máquina de
//! estados pura, sube las fotos antes de tocar el estado y aplica el
//! cambio con las escrituras transaccionales del repositorio. Ninguna
//! operación reintenta sola; ante un conflicto el caller refresca y
//! reenvía.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::job_dto::{
    AcceptJobRequest, CompleteJobRequest, CreateJobRequest, InspectionResponse, JobFilters,
    JobResponse, JobTransitionResponse, JobTransitionWithInspectionResponse, StartJobRequest,
};
use crate::dto::ApiResponse;
use crate::models::inspection::InspectionType;
use crate::models::job::{JobStatus, NewJob};
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::repositories::inspection_repository::InspectionRepository;
use crate::repositories::job_repository::JobRepository;
use crate::services::job_lifecycle;
use crate::services::photo_storage::PhotoStorageService;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::validation::{validate_coordinates, validate_non_negative, validate_vin};

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

pub struct JobController {
    jobs: JobRepository,
    assignments: AssignmentRepository,
    inspections: InspectionRepository,
    storage: PhotoStorageService,
    config: EnvironmentConfig,
}

impl JobController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Result<Self, AppError> {
        let storage = PhotoStorageService::new(&config)?;
        Ok(Self {
            jobs: JobRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool.clone()),
            inspections: InspectionRepository::new(pool),
            storage,
            config,
        })
    }

    pub async fn create(
        &self,
        request: CreateJobRequest,
    ) -> Result<ApiResponse<JobResponse>, AppError> {
        request.validate()?;

        let job_type = request
            .job_type
            .parse()
            .map_err(|e: String| bad_request_error(&e))?;

        if let Some(vin) = &request.vin {
            validate_vin(vin)
                .map_err(|_| bad_request_error("VIN failed check-digit validation"))?;
        }

        if let (Some(lat), Some(lng)) = (request.pickup_lat, request.pickup_lng) {
            validate_coordinates(lat, lng)
                .map_err(|_| bad_request_error("Invalid pickup coordinates"))?;
        }
        if let (Some(lat), Some(lng)) = (request.delivery_lat, request.delivery_lng) {
            validate_coordinates(lat, lng)
                .map_err(|_| bad_request_error("Invalid delivery coordinates"))?;
        }

        let distance_estimate_km = match request.distance_estimate_km {
            Some(km) => {
                validate_non_negative(km)
                    .map_err(|_| bad_request_error("Distance estimate cannot be negative"))?;
                Some(
                    Decimal::from_f64_retain(km)
                        .ok_or_else(|| bad_request_error("Invalid distance estimate"))?,
                )
            }
            None => None,
        };

        let job = self
            .jobs
            .create(NewJob {
                dealer_id: request.dealer_id,
                created_by: request.created_by,
                job_type,
                pickup_address: request.pickup_address,
                pickup_lat: request.pickup_lat,
                pickup_lng: request.pickup_lng,
                delivery_address: request.delivery_address,
                delivery_lat: request.delivery_lat,
                delivery_lng: request.delivery_lng,
                vehicle_year: request.vehicle_year,
                vehicle_make: request.vehicle_make,
                vehicle_model: request.vehicle_model,
                vin: request.vin,
                transmission: request.transmission,
                customer_name: request.customer_name,
                customer_phone: request.customer_phone,
                distance_estimate_km,
                notes: request.notes,
            })
            .await?;

        log::info!("📋 Job {} creado por dealer {}", job.id, job.dealer_id);
        Ok(ApiResponse::success_with_message(
            job.into(),
            "Job created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<JobResponse, AppError> {
        let job = self
            .jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Job", &id.to_string()))?;

        Ok(job.into())
    }

    pub async fn list(&self, filters: JobFilters) -> Result<Vec<JobResponse>, AppError> {
        let status = match filters.status.as_deref() {
            Some(raw) => Some(
                raw.parse::<JobStatus>()
                    .map_err(|e| bad_request_error(&e))?,
            ),
            None => None,
        };

        let limit = filters
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        let offset = filters.offset.unwrap_or(0).max(0);

        let jobs = self.jobs.list(status, filters.dealer_id, limit, offset).await?;
        Ok(jobs.into_iter().map(JobResponse::from).collect())
    }

    /// Driver acepta un job abierto: open → assigned
    pub async fn accept(
        &self,
        job_id: Uuid,
        request: AcceptJobRequest,
    ) -> Result<ApiResponse<JobTransitionResponse>, AppError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))?;

        let acceptance = job_lifecycle::accept(&job, request.driver_id, Utc::now())?;

        let (job, assignment) = self
            .assignments
            .accept_job(job_id, acceptance.driver_id, acceptance.accepted_at)
            .await?;

        log::info!("🤝 Job {} aceptado por driver {}", job.id, assignment.driver_id);
        Ok(ApiResponse::success_with_message(
            JobTransitionResponse {
                job: job.into(),
                assignment: assignment.into(),
            },
            "Job accepted".to_string(),
        ))
    }

    /// Driver inicia el drive: assigned → in_progress, con inspección pre-drive
    pub async fn start(
        &self,
        job_id: Uuid,
        request: StartJobRequest,
    ) -> Result<ApiResponse<JobTransitionWithInspectionResponse>, AppError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))?;

        let assignment = self
            .assignments
            .find_active_by_job(job_id)
            .await?
            .ok_or_else(|| not_found_error("Active assignment for job", &job_id.to_string()))?;

        if assignment.driver_id != request.driver_id {
            return Err(AppError::Forbidden(
                "The assignment belongs to another driver".to_string(),
            ));
        }

        // Validar la transición completa antes de subir una sola foto
        let transition = job_lifecycle::start(
            &job,
            &assignment,
            request.odometer_km,
            &request.photos,
            Utc::now(),
        )?;

        // Las fotos suben primero; si fallan, el estado no cambió
        let photo_urls = self
            .storage
            .upload_inspection_photos(job_id, InspectionType::PreDrive, &request.photos)
            .await?;

        let (job, assignment, inspection) = self
            .assignments
            .record_start(
                assignment.id,
                job_id,
                transition.started_at,
                transition.odometer_start_km,
                &photo_urls,
            )
            .await?;

        log::info!("🚦 Job {} iniciado por driver {}", job.id, assignment.driver_id);
        Ok(ApiResponse::success_with_message(
            JobTransitionWithInspectionResponse {
                job: job.into(),
                assignment: assignment.into(),
                inspection: inspection.into(),
            },
            "Job started".to_string(),
        ))
    }

    /// Driver completa el drive: in_progress → completed, con inspección post-drive
    pub async fn complete(
        &self,
        job_id: Uuid,
        request: CompleteJobRequest,
    ) -> Result<ApiResponse<JobTransitionWithInspectionResponse>, AppError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))?;

        let assignment = self
            .assignments
            .find_active_by_job(job_id)
            .await?
            .ok_or_else(|| not_found_error("Active assignment for job", &job_id.to_string()))?;

        if assignment.driver_id != request.driver_id {
            return Err(AppError::Forbidden(
                "The assignment belongs to another driver".to_string(),
            ));
        }

        let proof_photos: Vec<String> = request.proof_photo.clone().into_iter().collect();

        let transition = job_lifecycle::complete(
            &job,
            &assignment,
            request.odometer_km,
            request.dealer_plate.as_deref(),
            &self.config.dealer_plates,
            &proof_photos,
            Utc::now(),
        )?;

        let photo_urls = self
            .storage
            .upload_inspection_photos(job_id, InspectionType::PostDrive, &proof_photos)
            .await?;

        let (job, assignment, inspection) = self
            .assignments
            .record_completion(
                assignment.id,
                job_id,
                transition.ended_at,
                transition.odometer_end_km,
                &transition.dealer_plate,
                &photo_urls,
            )
            .await?;

        log::info!("✅ Job {} completado por driver {}", job.id, assignment.driver_id);
        Ok(ApiResponse::success_with_message(
            JobTransitionWithInspectionResponse {
                job: job.into(),
                assignment: assignment.into(),
                inspection: inspection.into(),
            },
            "Job completed".to_string(),
        ))
    }

    /// Dealer cancela un job abierto o asignado
    pub async fn cancel(&self, job_id: Uuid) -> Result<ApiResponse<JobResponse>, AppError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))?;

        job_lifecycle::cancel(&job)?;

        let job = self
            .assignments
            .cancel_job(job_id, job.status, Utc::now())
            .await?;

        log::info!("🚫 Job {} cancelado", job.id);
        Ok(ApiResponse::success_with_message(
            job.into(),
            "Job cancelled".to_string(),
        ))
    }

    pub async fn inspections(&self, job_id: Uuid) -> Result<Vec<InspectionResponse>, AppError> {
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))?;

        let inspections = self.inspections.find_by_job(job_id).await?;
        Ok(inspections.into_iter().map(InspectionResponse::from).collect())
    }
}
