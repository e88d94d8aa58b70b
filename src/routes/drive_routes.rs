//! Rutas del drive tracking

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::drive_controller::DriveController;
use crate::dto::drive_dto::{
    ActiveDriveResponse, DriveStatsResponse, DriveSummaryResponse, PositionUpdateRequest,
    StartDriveRequest,
};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_drive_router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_drive))
        .route("/position", post(record_position))
        .route("/stats", get(drive_stats))
        .route("/active", get(active_drive))
        .route("/complete", post(complete_drive))
}

async fn start_drive(
    State(state): State<AppState>,
    Json(request): Json<StartDriveRequest>,
) -> Result<Json<ApiResponse<ActiveDriveResponse>>, AppError> {
    let controller = DriveController::new(state.tracker.clone());
    let response = controller.start(request).await?;
    Ok(Json(response))
}

async fn record_position(
    State(state): State<AppState>,
    Json(request): Json<PositionUpdateRequest>,
) -> Result<Json<DriveStatsResponse>, AppError> {
    let controller = DriveController::new(state.tracker.clone());
    let response = controller.record_position(request).await?;
    Ok(Json(response))
}

async fn drive_stats(
    State(state): State<AppState>,
) -> Result<Json<DriveStatsResponse>, AppError> {
    let controller = DriveController::new(state.tracker.clone());
    let response = controller.stats().await?;
    Ok(Json(response))
}

async fn active_drive(
    State(state): State<AppState>,
) -> Result<Json<ActiveDriveResponse>, AppError> {
    let controller = DriveController::new(state.tracker.clone());
    let response = controller.active().await?;
    Ok(Json(response))
}

async fn complete_drive(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DriveSummaryResponse>>, AppError> {
    let controller = DriveController::new(state.tracker.clone());
    let response = controller.complete().await?;
    Ok(Json(response))
}
