//! Rutas de jobs

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::job_controller::JobController;
use crate::dto::job_dto::{
    AcceptJobRequest, CompleteJobRequest, CreateJobRequest, InspectionResponse, JobFilters,
    JobResponse, JobTransitionResponse, JobTransitionWithInspectionResponse, StartJobRequest,
};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_job_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_job))
        .route("/", get(list_jobs))
        .route("/:id", get(get_job))
        .route("/:id/accept", post(accept_job))
        .route("/:id/start", post(start_job))
        .route("/:id/complete", post(complete_job))
        .route("/:id/cancel", post(cancel_job))
        .route("/:id/inspections", get(list_inspections))
}

async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<ApiResponse<JobResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone())?;
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> Result<Json<Vec<JobResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone())?;
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone())?;
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn accept_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AcceptJobRequest>,
) -> Result<Json<ApiResponse<JobTransitionResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone())?;
    let response = controller.accept(id, request).await?;
    Ok(Json(response))
}

async fn start_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StartJobRequest>,
) -> Result<Json<ApiResponse<JobTransitionWithInspectionResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone())?;
    let response = controller.start(id, request).await?;
    Ok(Json(response))
}

async fn complete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteJobRequest>,
) -> Result<Json<ApiResponse<JobTransitionWithInspectionResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone())?;
    let response = controller.complete(id, request).await?;
    Ok(Json(response))
}

async fn cancel_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<JobResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone())?;
    let response = controller.cancel(id).await?;
    Ok(Json(response))
}

async fn list_inspections(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<InspectionResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone())?;
    let response = controller.inspections(id).await?;
    Ok(Json(response))
}
