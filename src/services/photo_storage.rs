//! Servicio de almacenamiento de fotos de inspección
//!
//! Sube las fotos (recibidas como base64 en el request) al object storage
//! del backend gestionado y devuelve las URLs públicas estables. La subida
//! ocurre antes de cualquier cambio de estado: si una foto falla, el job
//! y la asignación quedan intactos y el caller reintenta reenviando.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::models::inspection::InspectionType;
use crate::utils::errors::AppError;

pub struct PhotoStorageService {
    client: Client,
    base_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl PhotoStorageService {
    pub fn new(config: &EnvironmentConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Error building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.storage_base_url.trim_end_matches('/').to_string(),
            bucket: config.storage_bucket.clone(),
            api_key: config.storage_api_key.clone(),
        })
    }

    /// Subir las fotos de una inspección y devolver sus URLs públicas
    ///
    /// Las fotos se suben en orden; la primera que falla aborta el lote
    /// completo sin dejar estado a medias en el job.
    pub async fn upload_inspection_photos(
        &self,
        job_id: Uuid,
        inspection_type: InspectionType,
        photos_base64: &[String],
    ) -> Result<Vec<String>, AppError> {
        let mut urls = Vec::with_capacity(photos_base64.len());

        for (index, photo) in photos_base64.iter().enumerate() {
            let bytes = decode_photo(photo)?;
            let path = format!("jobs/{}/{}/{}.jpg", job_id, inspection_type.as_str(), index);
            let url = self.upload_object(&path, bytes).await?;
            urls.push(url);
        }

        log::info!(
            "📸 {} fotos {} subidas para job {}",
            urls.len(),
            inspection_type.as_str(),
            job_id
        );
        Ok(urls)
    }

    /// Subir un objeto por path (con overwrite) y devolver su URL pública
    async fn upload_object(&self, path: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        let upload_url = format!("{}/object/{}/{}", self.base_url, self.bucket, path);

        let mut request = self
            .client
            .put(&upload_url)
            .header("content-type", "image/jpeg")
            .header("x-upsert", "true")
            .body(bytes);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Photo upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Photo upload to '{}' returned status {}",
                path,
                response.status()
            )));
        }

        Ok(format!(
            "{}/object/public/{}/{}",
            self.base_url, self.bucket, path
        ))
    }
}

/// Decodificar una foto base64, aceptando el prefijo data-URL de los clientes
fn decode_photo(photo: &str) -> Result<Vec<u8>, AppError> {
    let payload = match photo.split_once(";base64,") {
        Some((_, data)) => data,
        None => photo,
    };

    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 photo payload: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Photo payload is empty".to_string()));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_photo_plain_base64() {
        let bytes = decode_photo("aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_photo_data_url() {
        let bytes = decode_photo("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_photo_rejects_garbage() {
        assert!(decode_photo("not base64 at all!!!").is_err());
        assert!(decode_photo("").is_err());
    }
}
