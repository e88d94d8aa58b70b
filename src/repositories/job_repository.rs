//! Repositorio de jobs
//!
//! Todas las escrituras que cambian el estado de un job usan un
//! compare-and-swap sobre el estado previo esperado: si otro actor ganó
//! la carrera, la fila no matchea y el caller recibe un conflicto
//! explícito en lugar de un last-write-wins silencioso.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::{Job, JobStatus, NewJob};
use crate::utils::errors::{conflicting_update_error, AppError};

pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_job: NewJob) -> Result<Job, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                id, dealer_id, created_by, job_type, status,
                pickup_address, pickup_lat, pickup_lng,
                delivery_address, delivery_lat, delivery_lng,
                vehicle_year, vehicle_make, vehicle_model, vin, transmission,
                customer_name, customer_phone, distance_estimate_km, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, 'open', $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $20)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new_job.dealer_id)
        .bind(new_job.created_by)
        .bind(new_job.job_type)
        .bind(new_job.pickup_address)
        .bind(new_job.pickup_lat)
        .bind(new_job.pickup_lng)
        .bind(new_job.delivery_address)
        .bind(new_job.delivery_lat)
        .bind(new_job.delivery_lng)
        .bind(new_job.vehicle_year)
        .bind(new_job.vehicle_make)
        .bind(new_job.vehicle_model)
        .bind(new_job.vin)
        .bind(new_job.transmission)
        .bind(new_job.customer_name)
        .bind(new_job.customer_phone)
        .bind(new_job.distance_estimate_km)
        .bind(new_job.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    pub async fn list(
        &self,
        status: Option<JobStatus>,
        dealer_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT * FROM jobs
            WHERE ($1::job_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR dealer_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(status)
        .bind(dealer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    /// Cambiar el estado de un job solo si todavía está en el estado esperado
    pub async fn update_status_cas(
        &self,
        id: Uuid,
        expected: JobStatus,
        new_status: JobStatus,
    ) -> Result<Job, AppError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $3, updated_at = $4
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(new_status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        job.ok_or_else(|| conflicting_update_error("Job", &id.to_string()))
    }
}
