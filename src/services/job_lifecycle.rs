//! Máquina de estados del ciclo de vida de un job
//!
//! Transiciones permitidas: open → assigned → in_progress → completed,
//! con cancelled alcanzable solo desde open o assigned. Estas funciones
//! son puras sobre el modelo de datos: validan precondiciones y producen
//! los valores de la transición, sin tocar almacenamiento. La capa de
//! repositorios aplica el cambio con un compare-and-swap sobre el estado
//! previo esperado, así una carrera entre dos actores termina en
//! conflicto explícito y no en un last-write-wins silencioso.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::assignment::Assignment;
use crate::models::job::{Job, JobStatus};

/// Errores de transición del ciclo de vida
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("Job is no longer open, it was already taken by another driver")]
    AlreadyAssigned,

    #[error("Cannot {action} a job in status '{from}'")]
    InvalidTransition { from: JobStatus, action: &'static str },

    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(&'static str),

    #[error("Invalid odometer reading: {0}")]
    InvalidReading(String),
}

/// Valores producidos por una aceptación válida
#[derive(Debug, Clone, PartialEq)]
pub struct Acceptance {
    pub driver_id: Uuid,
    pub accepted_at: DateTime<Utc>,
    pub new_status: JobStatus,
}

/// Valores producidos por un inicio de drive válido
#[derive(Debug, Clone, PartialEq)]
pub struct StartTransition {
    pub started_at: DateTime<Utc>,
    pub odometer_start_km: Decimal,
    pub new_status: JobStatus,
}

/// Valores producidos por una finalización válida
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteTransition {
    pub ended_at: DateTime<Utc>,
    pub odometer_end_km: Decimal,
    pub dealer_plate: String,
    pub new_status: JobStatus,
}

/// Aceptar un job abierto
///
/// Solo válido desde open. Cualquier otro estado señala AlreadyAssigned:
/// el caller debe refrescar el job y reevaluar, no reintentar a ciegas.
pub fn accept(job: &Job, driver_id: Uuid, now: DateTime<Utc>) -> Result<Acceptance, LifecycleError> {
    if job.status != JobStatus::Open {
        return Err(LifecycleError::AlreadyAssigned);
    }

    Ok(Acceptance {
        driver_id,
        accepted_at: now,
        new_status: JobStatus::Assigned,
    })
}

/// Iniciar el drive de un job asignado
///
/// Requiere al menos una foto de inspección y un odómetro numérico.
/// Ninguna validación fallida produce estado parcial: las fotos deben
/// subir antes de que el estado cambie, y esta función se evalúa antes
/// de intentar cualquier escritura.
pub fn start(
    job: &Job,
    assignment: &Assignment,
    odometer_km: Option<f64>,
    photos: &[String],
    now: DateTime<Utc>,
) -> Result<StartTransition, LifecycleError> {
    if job.status != JobStatus::Assigned {
        return Err(LifecycleError::InvalidTransition {
            from: job.status,
            action: "start",
        });
    }

    if assignment.started_at.is_some() || !assignment.is_active() {
        return Err(LifecycleError::InvalidTransition {
            from: job.status,
            action: "start",
        });
    }

    if photos.is_empty() {
        return Err(LifecycleError::MissingPrerequisite(
            "at least one pre-drive inspection photo is required",
        ));
    }

    let odometer = parse_odometer(odometer_km)?;

    Ok(StartTransition {
        started_at: now,
        odometer_start_km: odometer,
        new_status: JobStatus::InProgress,
    })
}

/// Completar el drive de un job en progreso
///
/// Requiere foto de prueba de entrega, una placa del set configurado y
/// un odómetro final no menor que el inicial.
pub fn complete(
    job: &Job,
    assignment: &Assignment,
    odometer_km: Option<f64>,
    dealer_plate: Option<&str>,
    allowed_plates: &[String],
    proof_photos: &[String],
    now: DateTime<Utc>,
) -> Result<CompleteTransition, LifecycleError> {
    if job.status != JobStatus::InProgress {
        return Err(LifecycleError::InvalidTransition {
            from: job.status,
            action: "complete",
        });
    }

    if !assignment.is_in_progress() || assignment.cancelled_at.is_some() {
        return Err(LifecycleError::InvalidTransition {
            from: job.status,
            action: "complete",
        });
    }

    if proof_photos.is_empty() {
        return Err(LifecycleError::MissingPrerequisite(
            "a proof-of-delivery photo is required",
        ));
    }

    let plate = match dealer_plate {
        Some(p) if !p.trim().is_empty() => p.trim().to_string(),
        _ => {
            return Err(LifecycleError::MissingPrerequisite(
                "a dealer plate must be selected",
            ))
        }
    };

    if !allowed_plates.iter().any(|allowed| allowed == &plate) {
        return Err(LifecycleError::MissingPrerequisite(
            "the dealer plate must be one of the configured plate set",
        ));
    }

    let odometer = parse_odometer(odometer_km)?;

    if let Some(start_km) = assignment.odometer_start_km {
        if odometer < start_km {
            return Err(LifecycleError::InvalidReading(format!(
                "ending odometer {} is lower than starting odometer {}",
                odometer, start_km
            )));
        }
    }

    Ok(CompleteTransition {
        ended_at: now,
        odometer_end_km: odometer,
        dealer_plate: plate,
        new_status: JobStatus::Completed,
    })
}

/// Cancelar un job
///
/// Solo válido desde open o assigned. La asignación, si existe, se marca
/// como cancelada en lugar de borrarse, para conservar el historial.
pub fn cancel(job: &Job) -> Result<JobStatus, LifecycleError> {
    match job.status {
        JobStatus::Open | JobStatus::Assigned => Ok(JobStatus::Cancelled),
        from => Err(LifecycleError::InvalidTransition {
            from,
            action: "cancel",
        }),
    }
}

fn parse_odometer(odometer_km: Option<f64>) -> Result<Decimal, LifecycleError> {
    let value = odometer_km
        .ok_or_else(|| LifecycleError::InvalidReading("odometer reading is required".to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(LifecycleError::InvalidReading(format!(
            "odometer reading {} is not a valid non-negative number",
            value
        )));
    }

    Decimal::from_f64_retain(value)
        .ok_or_else(|| LifecycleError::InvalidReading(format!("odometer reading {} is out of range", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobType;

    fn test_job(status: JobStatus) -> Job {
        Job {
            id: Uuid::new_v4(),
            dealer_id: Uuid::new_v4(),
            created_by: None,
            job_type: JobType::Delivery,
            status,
            pickup_address: "123 Dealer Row".to_string(),
            pickup_lat: None,
            pickup_lng: None,
            delivery_address: "456 Customer Ave".to_string(),
            delivery_lat: None,
            delivery_lng: None,
            vehicle_year: Some(2022),
            vehicle_make: Some("Toyota".to_string()),
            vehicle_model: Some("Camry".to_string()),
            vin: None,
            transmission: Some("automatic".to_string()),
            customer_name: None,
            customer_phone: None,
            distance_estimate_km: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_assignment(job: &Job, driver_id: Uuid) -> Assignment {
        Assignment {
            id: Uuid::new_v4(),
            job_id: job.id,
            driver_id,
            accepted_at: Utc::now(),
            started_at: None,
            ended_at: None,
            cancelled_at: None,
            odometer_start_km: None,
            odometer_end_km: None,
        }
    }

    fn plates() -> Vec<String> {
        vec!["X".to_string(), "Y".to_string(), "Z".to_string()]
    }

    fn photos() -> Vec<String> {
        vec!["https://storage.example.com/jobs/1/pre_drive/0.jpg".to_string()]
    }

    #[test]
    fn test_accept_open_job() {
        let job = test_job(JobStatus::Open);
        let driver = Uuid::new_v4();
        let now = Utc::now();

        let acceptance = accept(&job, driver, now).unwrap();
        assert_eq!(acceptance.driver_id, driver);
        assert_eq!(acceptance.accepted_at, now);
        assert_eq!(acceptance.new_status, JobStatus::Assigned);
    }

    #[test]
    fn test_accept_fails_when_not_open() {
        for status in [
            JobStatus::Assigned,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Cancelled,
        ] {
            let job = test_job(status);
            let result = accept(&job, Uuid::new_v4(), Utc::now());
            assert_eq!(result.unwrap_err(), LifecycleError::AlreadyAssigned);
        }
    }

    #[test]
    fn test_start_without_photos_does_not_transition() {
        let job = test_job(JobStatus::Assigned);
        let assignment = test_assignment(&job, Uuid::new_v4());

        let result = start(&job, &assignment, Some(1000.0), &[], Utc::now());
        assert!(matches!(result, Err(LifecycleError::MissingPrerequisite(_))));
        // La validación no produjo ningún valor de transición, así que el
        // caller no tiene nada que persistir: job y assignment quedan igual.
        assert_eq!(job.status, JobStatus::Assigned);
        assert!(assignment.started_at.is_none());
    }

    #[test]
    fn test_start_without_odometer_fails() {
        let job = test_job(JobStatus::Assigned);
        let assignment = test_assignment(&job, Uuid::new_v4());

        let result = start(&job, &assignment, None, &photos(), Utc::now());
        assert!(matches!(result, Err(LifecycleError::InvalidReading(_))));

        let result = start(&job, &assignment, Some(f64::NAN), &photos(), Utc::now());
        assert!(matches!(result, Err(LifecycleError::InvalidReading(_))));

        let result = start(&job, &assignment, Some(-10.0), &photos(), Utc::now());
        assert!(matches!(result, Err(LifecycleError::InvalidReading(_))));
    }

    #[test]
    fn test_start_requires_assigned_status() {
        for status in [
            JobStatus::Open,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Cancelled,
        ] {
            let job = test_job(status);
            let assignment = test_assignment(&job, Uuid::new_v4());
            let result = start(&job, &assignment, Some(1000.0), &photos(), Utc::now());
            assert!(matches!(result, Err(LifecycleError::InvalidTransition { .. })));
        }
    }

    #[test]
    fn test_start_twice_fails() {
        let job = test_job(JobStatus::Assigned);
        let mut assignment = test_assignment(&job, Uuid::new_v4());
        assignment.started_at = Some(Utc::now());

        let result = start(&job, &assignment, Some(1000.0), &photos(), Utc::now());
        assert!(matches!(result, Err(LifecycleError::InvalidTransition { .. })));
    }

    #[test]
    fn test_complete_without_plate_leaves_assignment_open() {
        let job = test_job(JobStatus::InProgress);
        let mut assignment = test_assignment(&job, Uuid::new_v4());
        assignment.started_at = Some(Utc::now());
        assignment.odometer_start_km = Some(Decimal::new(1000, 0));

        let result = complete(
            &job,
            &assignment,
            Some(1050.0),
            None,
            &plates(),
            &photos(),
            Utc::now(),
        );
        assert!(matches!(result, Err(LifecycleError::MissingPrerequisite(_))));
        assert!(assignment.ended_at.is_none());
    }

    #[test]
    fn test_complete_with_unknown_plate_fails() {
        let job = test_job(JobStatus::InProgress);
        let mut assignment = test_assignment(&job, Uuid::new_v4());
        assignment.started_at = Some(Utc::now());

        let result = complete(
            &job,
            &assignment,
            Some(1050.0),
            Some("W"),
            &plates(),
            &photos(),
            Utc::now(),
        );
        assert!(matches!(result, Err(LifecycleError::MissingPrerequisite(_))));
    }

    #[test]
    fn test_complete_without_proof_photo_fails() {
        let job = test_job(JobStatus::InProgress);
        let mut assignment = test_assignment(&job, Uuid::new_v4());
        assignment.started_at = Some(Utc::now());

        let result = complete(
            &job,
            &assignment,
            Some(1050.0),
            Some("Y"),
            &plates(),
            &[],
            Utc::now(),
        );
        assert!(matches!(result, Err(LifecycleError::MissingPrerequisite(_))));
    }

    #[test]
    fn test_complete_rejects_regressing_odometer() {
        let job = test_job(JobStatus::InProgress);
        let mut assignment = test_assignment(&job, Uuid::new_v4());
        assignment.started_at = Some(Utc::now());
        assignment.odometer_start_km = Some(Decimal::new(1000, 0));

        let result = complete(
            &job,
            &assignment,
            Some(900.0),
            Some("Y"),
            &plates(),
            &photos(),
            Utc::now(),
        );
        assert!(matches!(result, Err(LifecycleError::InvalidReading(_))));
    }

    #[test]
    fn test_cancel_only_from_open_or_assigned() {
        assert_eq!(cancel(&test_job(JobStatus::Open)).unwrap(), JobStatus::Cancelled);
        assert_eq!(cancel(&test_job(JobStatus::Assigned)).unwrap(), JobStatus::Cancelled);

        for status in [JobStatus::InProgress, JobStatus::Completed, JobStatus::Cancelled] {
            let result = cancel(&test_job(status));
            assert!(matches!(result, Err(LifecycleError::InvalidTransition { .. })));
        }
    }

    #[test]
    fn test_only_valid_edges_are_reachable() {
        // Cada operación solo produce su arista permitida del grafo
        // open → assigned → in_progress → completed, más las dos
        // cancelaciones. Todo el resto falla cerrado.
        let statuses = [
            JobStatus::Open,
            JobStatus::Assigned,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Cancelled,
        ];

        for status in statuses {
            let job = test_job(status);
            let driver = Uuid::new_v4();
            let assignment = test_assignment(&job, driver);

            if let Ok(acceptance) = accept(&job, driver, Utc::now()) {
                assert_eq!((status, acceptance.new_status), (JobStatus::Open, JobStatus::Assigned));
            }

            if let Ok(transition) = start(&job, &assignment, Some(100.0), &photos(), Utc::now()) {
                assert_eq!(
                    (status, transition.new_status),
                    (JobStatus::Assigned, JobStatus::InProgress)
                );
            }

            let mut started = assignment.clone();
            started.started_at = Some(Utc::now());
            if let Ok(transition) = complete(
                &job,
                &started,
                Some(200.0),
                Some("Y"),
                &plates(),
                &photos(),
                Utc::now(),
            ) {
                assert_eq!(
                    (status, transition.new_status),
                    (JobStatus::InProgress, JobStatus::Completed)
                );
            }

            if let Ok(new_status) = cancel(&job) {
                assert_eq!(new_status, JobStatus::Cancelled);
                assert!(matches!(status, JobStatus::Open | JobStatus::Assigned));
            }
        }
    }

    #[test]
    fn test_full_delivery_scenario() {
        // Dealer crea el job, driver lo acepta, inicia con odómetro 1000 y
        // una foto, y lo completa con odómetro 1050, placa Y y foto de
        // prueba. Estado final: una asignación, dos inspecciones, completed.
        let mut job = test_job(JobStatus::Open);
        let driver = Uuid::new_v4();
        let mut inspections: Vec<crate::models::inspection::InspectionType> = Vec::new();

        let acceptance = accept(&job, driver, Utc::now()).unwrap();
        job.status = acceptance.new_status;
        let mut assignment = Assignment {
            id: Uuid::new_v4(),
            job_id: job.id,
            driver_id: acceptance.driver_id,
            accepted_at: acceptance.accepted_at,
            started_at: None,
            ended_at: None,
            cancelled_at: None,
            odometer_start_km: None,
            odometer_end_km: None,
        };

        let start_transition = start(&job, &assignment, Some(1000.0), &photos(), Utc::now()).unwrap();
        job.status = start_transition.new_status;
        assignment.started_at = Some(start_transition.started_at);
        assignment.odometer_start_km = Some(start_transition.odometer_start_km);
        inspections.push(crate::models::inspection::InspectionType::PreDrive);

        let complete_transition = complete(
            &job,
            &assignment,
            Some(1050.0),
            Some("Y"),
            &plates(),
            &photos(),
            Utc::now(),
        )
        .unwrap();
        job.status = complete_transition.new_status;
        assignment.ended_at = Some(complete_transition.ended_at);
        assignment.odometer_end_km = Some(complete_transition.odometer_end_km);
        inspections.push(crate::models::inspection::InspectionType::PostDrive);

        assert_eq!(job.status, JobStatus::Completed);
        assert!(assignment.accepted_at <= assignment.started_at.unwrap());
        assert!(assignment.started_at.unwrap() <= assignment.ended_at.unwrap());
        assert_eq!(assignment.odometer_end_km, Some(Decimal::new(1050, 0)));
        assert_eq!(inspections.len(), 2);
        assert_eq!(complete_transition.dealer_plate, "Y");
    }
}
