//! Repositorio de asignaciones
//!
//! Las transiciones que tocan job + assignment (+ inspección) se aplican
//! dentro de una sola transacción: o se persiste el paso completo o no
//! se persiste nada. Cada UPDATE lleva su guard de estado previo, así una
//! carrera entre dos actores termina en rollback y conflicto explícito.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::assignment::Assignment;
use crate::models::inspection::{InspectionType, VehicleInspection};
use crate::models::job::{Job, JobStatus};
use crate::utils::errors::{conflicting_update_error, AppError};

pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(assignment)
    }

    /// La asignación activa de un job: ni terminada ni cancelada
    pub async fn find_active_by_job(&self, job_id: Uuid) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM assignments
            WHERE job_id = $1 AND ended_at IS NULL AND cancelled_at IS NULL
            ORDER BY accepted_at DESC
            LIMIT 1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    pub async fn find_by_driver(&self, driver_id: Uuid) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE driver_id = $1 ORDER BY accepted_at DESC",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    /// Aceptación: crear la asignación y pasar el job de open a assigned,
    /// atómicamente
    pub async fn accept_job(
        &self,
        job_id: Uuid,
        driver_id: Uuid,
        accepted_at: DateTime<Utc>,
    ) -> Result<(Job, Assignment), AppError> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(JobStatus::Assigned)
        .bind(accepted_at)
        .bind(JobStatus::Open)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| conflicting_update_error("Job", &job_id.to_string()))?;

        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (id, job_id, driver_id, accepted_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(driver_id)
        .bind(accepted_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((job, assignment))
    }

    /// Inicio del drive: started_at + odómetro inicial, job a in_progress
    /// y la inspección pre_drive, en una sola transacción
    pub async fn record_start(
        &self,
        assignment_id: Uuid,
        job_id: Uuid,
        started_at: DateTime<Utc>,
        odometer_start_km: Decimal,
        photo_urls: &[String],
    ) -> Result<(Job, Assignment, VehicleInspection), AppError> {
        let mut tx = self.pool.begin().await?;

        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET started_at = $2, odometer_start_km = $3
            WHERE id = $1 AND started_at IS NULL AND cancelled_at IS NULL
            RETURNING *
            "#,
        )
        .bind(assignment_id)
        .bind(started_at)
        .bind(odometer_start_km)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| conflicting_update_error("Assignment", &assignment_id.to_string()))?;

        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(JobStatus::InProgress)
        .bind(started_at)
        .bind(JobStatus::Assigned)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| conflicting_update_error("Job", &job_id.to_string()))?;

        let inspection = insert_inspection(
            &mut tx,
            job_id,
            assignment_id,
            InspectionType::PreDrive,
            photo_urls,
            Some(odometer_start_km),
            None,
            started_at,
        )
        .await?;

        tx.commit().await?;
        Ok((job, assignment, inspection))
    }

    /// Finalización: ended_at + odómetro final, job a completed y la
    /// inspección post_drive con la foto de prueba, en una sola transacción
    pub async fn record_completion(
        &self,
        assignment_id: Uuid,
        job_id: Uuid,
        ended_at: DateTime<Utc>,
        odometer_end_km: Decimal,
        dealer_plate: &str,
        photo_urls: &[String],
    ) -> Result<(Job, Assignment, VehicleInspection), AppError> {
        let mut tx = self.pool.begin().await?;

        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET ended_at = $2, odometer_end_km = $3
            WHERE id = $1 AND started_at IS NOT NULL AND ended_at IS NULL AND cancelled_at IS NULL
            RETURNING *
            "#,
        )
        .bind(assignment_id)
        .bind(ended_at)
        .bind(odometer_end_km)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| conflicting_update_error("Assignment", &assignment_id.to_string()))?;

        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(JobStatus::Completed)
        .bind(ended_at)
        .bind(JobStatus::InProgress)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| conflicting_update_error("Job", &job_id.to_string()))?;

        let inspection = insert_inspection(
            &mut tx,
            job_id,
            assignment_id,
            InspectionType::PostDrive,
            photo_urls,
            Some(odometer_end_km),
            Some(dealer_plate),
            ended_at,
        )
        .await?;

        tx.commit().await?;
        Ok((job, assignment, inspection))
    }

    /// Cancelación: job a cancelled desde su estado actual y soft-delete
    /// de la asignación activa si existe
    pub async fn cancel_job(
        &self,
        job_id: Uuid,
        expected_status: JobStatus,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Job, AppError> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(JobStatus::Cancelled)
        .bind(cancelled_at)
        .bind(expected_status)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| conflicting_update_error("Job", &job_id.to_string()))?;

        // La asignación se conserva para auditoría, solo se marca cancelada
        sqlx::query(
            r#"
            UPDATE assignments
            SET cancelled_at = $2
            WHERE job_id = $1 AND ended_at IS NULL AND cancelled_at IS NULL
            "#,
        )
        .bind(job_id)
        .bind(cancelled_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(job)
    }
}

#[allow(clippy::too_many_arguments)]
async fn insert_inspection(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    job_id: Uuid,
    assignment_id: Uuid,
    inspection_type: InspectionType,
    photo_urls: &[String],
    odometer_km: Option<Decimal>,
    dealer_plate: Option<&str>,
    created_at: DateTime<Utc>,
) -> Result<VehicleInspection, AppError> {
    let inspection = sqlx::query_as::<_, VehicleInspection>(
        r#"
        INSERT INTO vehicle_inspections (
            id, job_id, assignment_id, inspection_type,
            photo_urls, odometer_km, dealer_plate, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(assignment_id)
    .bind(inspection_type)
    .bind(photo_urls)
    .bind(odometer_km)
    .bind(dealer_plate)
    .bind(created_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(inspection)
}
