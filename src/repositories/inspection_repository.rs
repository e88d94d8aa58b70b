//! Repositorio de inspecciones
//!
//! Las inspecciones son insert-only; este repositorio solo las consulta.
//! La inserción ocurre dentro de las transacciones de transición en el
//! repositorio de asignaciones.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::inspection::VehicleInspection;
use crate::utils::errors::AppError;

pub struct InspectionRepository {
    pool: PgPool,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<VehicleInspection>, AppError> {
        let inspections = sqlx::query_as::<_, VehicleInspection>(
            "SELECT * FROM vehicle_inspections WHERE job_id = $1 ORDER BY created_at ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(inspections)
    }

    pub async fn find_by_assignment(
        &self,
        assignment_id: Uuid,
    ) -> Result<Vec<VehicleInspection>, AppError> {
        let inspections = sqlx::query_as::<_, VehicleInspection>(
            "SELECT * FROM vehicle_inspections WHERE assignment_id = $1 ORDER BY created_at ASC",
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(inspections)
    }
}
