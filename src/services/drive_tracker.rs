//! Rastreador del drive activo
//!
//! Acumula distancia y tiempo para el único drive activo del proceso y
//! publica las estadísticas actualizadas a los suscriptores en cada fix.
//! El drive activo es el único recurso mutable compartido y solo los
//! métodos de este servicio lo tocan; los fixes llegan como una secuencia
//! push y los observadores se cuelgan de un canal broadcast en lugar de
//! una lista de callbacks.

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::models::drive::{ActiveDrive, ActiveDriveInfo, DriveStats, DriveSummary, PositionFix};

/// Radio medio de la Tierra en metros
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Umbral de jitter GPS por defecto: deltas menores se descartan para no
/// acumular deriva cuando el vehículo está detenido
pub const DEFAULT_JITTER_FLOOR_METERS: f64 = 5.0;

/// Capacidad del canal de publicación de estadísticas
const STATS_CHANNEL_CAPACITY: usize = 64;

/// Errores del rastreador
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriveError {
    #[error("A drive is already being tracked for job {job_id}")]
    AlreadyTracking { job_id: Uuid },

    #[error("No drive is currently being tracked")]
    NotTracking,
}

pub struct DriveTracker {
    active: RwLock<Option<ActiveDrive>>,
    updates: broadcast::Sender<DriveStats>,
    jitter_floor_meters: f64,
}

impl DriveTracker {
    pub fn new(jitter_floor_meters: f64) -> Self {
        let (updates, _) = broadcast::channel(STATS_CHANNEL_CAPACITY);
        Self {
            active: RwLock::new(None),
            updates,
            jitter_floor_meters,
        }
    }

    /// Iniciar el rastreo de un drive
    ///
    /// Falla si ya hay un drive activo: iniciar un segundo drive nunca
    /// reemplaza silenciosamente al primero.
    pub async fn start_drive(
        &self,
        assignment_id: Uuid,
        job_id: Uuid,
        driver_id: Uuid,
    ) -> Result<ActiveDriveInfo, DriveError> {
        let mut active = self.active.write().await;

        if let Some(current) = active.as_ref() {
            return Err(DriveError::AlreadyTracking {
                job_id: current.job_id,
            });
        }

        let drive = ActiveDrive::new(job_id, assignment_id, driver_id, Utc::now());
        let info = ActiveDriveInfo::from(&drive);
        *active = Some(drive);

        log::info!("🚗 Drive tracking iniciado para job {}", job_id);
        Ok(info)
    }

    /// Registrar un fix de posición
    ///
    /// Suma la distancia de círculo máximo desde la última posición que
    /// contribuyó al total, descartando deltas por debajo del umbral de
    /// jitter, y publica las estadísticas a todos los suscriptores.
    pub async fn record_position(&self, fix: PositionFix) -> Result<DriveStats, DriveError> {
        let mut active = self.active.write().await;
        let drive = active.as_mut().ok_or(DriveError::NotTracking)?;

        if let Some((anchor_lat, anchor_lng)) = drive.anchor {
            let leg = haversine_meters(anchor_lat, anchor_lng, fix.latitude, fix.longitude);
            if leg >= self.jitter_floor_meters {
                drive.total_distance_meters += leg;
                drive.anchor = Some((fix.latitude, fix.longitude));
            }
        } else {
            drive.anchor = Some((fix.latitude, fix.longitude));
        }

        drive.positions.push(fix);

        let stats = DriveStats {
            elapsed_seconds: (fix.timestamp - drive.started_at).num_seconds().max(0),
            total_distance_meters: drive.total_distance_meters,
            position_count: drive.positions.len(),
        };

        // Sin suscriptores el send falla; el rastreo sigue igual
        let _ = self.updates.send(stats);

        Ok(stats)
    }

    /// Suscribirse a las estadísticas del drive
    ///
    /// Varios componentes pueden suscribirse al mismo drive a la vez;
    /// des-suscribirse es soltar el receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<DriveStats> {
        self.updates.subscribe()
    }

    /// Descriptor del drive activo, para componentes que montan tarde
    pub async fn active_drive(&self) -> Option<ActiveDriveInfo> {
        self.active.read().await.as_ref().map(ActiveDriveInfo::from)
    }

    /// Snapshot sincrónico de las estadísticas actuales
    pub async fn current_stats(&self) -> Option<DriveStats> {
        self.active.read().await.as_ref().map(|drive| DriveStats {
            elapsed_seconds: (Utc::now() - drive.started_at).num_seconds().max(0),
            total_distance_meters: drive.total_distance_meters,
            position_count: drive.positions.len(),
        })
    }

    /// Terminar el rastreo y devolver el resumen final
    ///
    /// Limpia el singleton; la persistencia del resumen es responsabilidad
    /// del caller.
    pub async fn complete_drive(&self) -> Result<DriveSummary, DriveError> {
        let mut active = self.active.write().await;
        let drive = active.take().ok_or(DriveError::NotTracking)?;

        let ended_at = Utc::now();
        let summary = DriveSummary {
            job_id: drive.job_id,
            assignment_id: drive.assignment_id,
            driver_id: drive.driver_id,
            started_at: drive.started_at,
            ended_at,
            elapsed_seconds: (ended_at - drive.started_at).num_seconds().max(0),
            total_distance_meters: drive.total_distance_meters,
            position_count: drive.positions.len(),
        };

        log::info!(
            "🏁 Drive tracking terminado para job {}: {:.0} m en {} s",
            summary.job_id,
            summary.total_distance_meters,
            summary.elapsed_seconds
        );
        Ok(summary)
    }
}

impl Default for DriveTracker {
    fn default() -> Self {
        Self::new(DEFAULT_JITTER_FLOOR_METERS)
    }
}

/// Distancia de círculo máximo entre dos coordenadas, en metros
pub fn haversine_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lng2 - lng1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fix(latitude: f64, longitude: f64, offset_seconds: i64) -> PositionFix {
        PositionFix {
            timestamp: Utc::now() + Duration::seconds(offset_seconds),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_haversine_known_distance() {
        // 0.001° de longitud en el ecuador son ~111.19 m
        let d = haversine_meters(0.0, 0.0, 0.0, 0.001);
        assert!((d - 111.19).abs() < 1.0, "got {}", d);

        // Distancia cero entre puntos idénticos
        assert_eq!(haversine_meters(48.85, 2.35, 48.85, 2.35), 0.0);
    }

    #[tokio::test]
    async fn test_accumulates_leg_distances() {
        let tracker = DriveTracker::default();
        tracker
            .start_drive(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        tracker.record_position(fix(0.0, 0.0, 0)).await.unwrap();
        tracker.record_position(fix(0.0, 0.001, 10)).await.unwrap();
        let stats = tracker.record_position(fix(0.0, 0.002, 20)).await.unwrap();

        let expected = haversine_meters(0.0, 0.0, 0.0, 0.001) + haversine_meters(0.0, 0.001, 0.0, 0.002);
        let relative_error = (stats.total_distance_meters - expected).abs() / expected;
        assert!(relative_error < 0.01, "got {} expected {}", stats.total_distance_meters, expected);
        assert_eq!(stats.position_count, 3);
        assert!(stats.elapsed_seconds >= 20);
    }

    #[tokio::test]
    async fn test_second_start_fails_and_keeps_original() {
        let tracker = DriveTracker::default();
        let first_job = Uuid::new_v4();
        tracker
            .start_drive(Uuid::new_v4(), first_job, Uuid::new_v4())
            .await
            .unwrap();

        tracker.record_position(fix(0.0, 0.0, 0)).await.unwrap();
        tracker.record_position(fix(0.0, 0.001, 5)).await.unwrap();
        let before = tracker.current_stats().await.unwrap();

        let result = tracker
            .start_drive(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .await;
        assert_eq!(result.unwrap_err(), DriveError::AlreadyTracking { job_id: first_job });

        // El drive original sigue intacto
        let after = tracker.current_stats().await.unwrap();
        assert_eq!(after.total_distance_meters, before.total_distance_meters);
        assert_eq!(tracker.active_drive().await.unwrap().job_id, first_job);
    }

    #[tokio::test]
    async fn test_jitter_floor_discards_stationary_noise() {
        let tracker = DriveTracker::new(5.0);
        tracker
            .start_drive(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        tracker.record_position(fix(0.0, 0.0, 0)).await.unwrap();
        // ~1.1 m de ruido: por debajo del umbral, no acumula
        let stats = tracker.record_position(fix(0.0, 0.00001, 5)).await.unwrap();
        assert_eq!(stats.total_distance_meters, 0.0);
        assert_eq!(stats.position_count, 2);

        // El movimiento real se mide desde el ancla, no desde el ruido
        let stats = tracker.record_position(fix(0.0, 0.001, 10)).await.unwrap();
        let expected = haversine_meters(0.0, 0.0, 0.0, 0.001);
        assert!((stats.total_distance_meters - expected).abs() < 1.0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_stats() {
        let tracker = DriveTracker::default();
        tracker
            .start_drive(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        let mut first = tracker.subscribe();
        let mut second = tracker.subscribe();

        let published = tracker.record_position(fix(10.0, 20.0, 0)).await.unwrap();

        assert_eq!(first.recv().await.unwrap(), published);
        assert_eq!(second.recv().await.unwrap(), published);
    }

    #[tokio::test]
    async fn test_complete_drive_clears_singleton() {
        let tracker = DriveTracker::default();
        let job_id = Uuid::new_v4();
        tracker
            .start_drive(Uuid::new_v4(), job_id, Uuid::new_v4())
            .await
            .unwrap();
        tracker.record_position(fix(0.0, 0.0, 0)).await.unwrap();
        tracker.record_position(fix(0.0, 0.002, 30)).await.unwrap();

        let summary = tracker.complete_drive().await.unwrap();
        assert_eq!(summary.job_id, job_id);
        assert_eq!(summary.position_count, 2);
        assert!(summary.total_distance_meters > 200.0);

        assert!(tracker.active_drive().await.is_none());
        assert!(tracker.current_stats().await.is_none());
        assert_eq!(tracker.complete_drive().await.unwrap_err(), DriveError::NotTracking);

        // Con el singleton limpio puede iniciarse un nuevo drive
        tracker
            .start_drive(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_record_position_without_drive_fails() {
        let tracker = DriveTracker::default();
        let result = tracker.record_position(fix(0.0, 0.0, 0)).await;
        assert_eq!(result.unwrap_err(), DriveError::NotTracking);
    }
}
