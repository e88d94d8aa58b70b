//! Controller del drive tracking
//!
//! Capa fina sobre el DriveTracker del estado compartido. Valida los
//! fixes entrantes y deja que el tracker sea el único que muta el drive
//! activo.

use std::sync::Arc;

use chrono::Utc;

use crate::dto::drive_dto::{
    ActiveDriveResponse, DriveStatsResponse, DriveSummaryResponse, PositionUpdateRequest,
    StartDriveRequest,
};
use crate::dto::ApiResponse;
use crate::models::drive::PositionFix;
use crate::services::drive_tracker::{DriveError, DriveTracker};
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::validate_coordinates;

pub struct DriveController {
    tracker: Arc<DriveTracker>,
}

impl DriveController {
    pub fn new(tracker: Arc<DriveTracker>) -> Self {
        Self { tracker }
    }

    pub async fn start(
        &self,
        request: StartDriveRequest,
    ) -> Result<ApiResponse<ActiveDriveResponse>, AppError> {
        let info = self
            .tracker
            .start_drive(request.assignment_id, request.job_id, request.driver_id)
            .await?;

        Ok(ApiResponse::success_with_message(
            info.into(),
            "Drive tracking started".to_string(),
        ))
    }

    pub async fn record_position(
        &self,
        request: PositionUpdateRequest,
    ) -> Result<DriveStatsResponse, AppError> {
        validate_coordinates(request.latitude, request.longitude)
            .map_err(|_| bad_request_error("Invalid GPS coordinates"))?;

        let fix = PositionFix {
            timestamp: request.timestamp.unwrap_or_else(Utc::now),
            latitude: request.latitude,
            longitude: request.longitude,
        };

        let stats = self.tracker.record_position(fix).await?;
        Ok(stats.into())
    }

    pub async fn stats(&self) -> Result<DriveStatsResponse, AppError> {
        let stats = self
            .tracker
            .current_stats()
            .await
            .ok_or(AppError::Drive(DriveError::NotTracking))?;

        Ok(stats.into())
    }

    pub async fn active(&self) -> Result<ActiveDriveResponse, AppError> {
        let info = self
            .tracker
            .active_drive()
            .await
            .ok_or(AppError::Drive(DriveError::NotTracking))?;

        Ok(info.into())
    }

    pub async fn complete(&self) -> Result<ApiResponse<DriveSummaryResponse>, AppError> {
        let summary = self.tracker.complete_drive().await?;

        Ok(ApiResponse::success_with_message(
            summary.into(),
            "Drive tracking completed".to_string(),
        ))
    }
}
