use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::config::supabase_config::SupabaseConfig;
use crate::ports::object_storage_port::{ObjectStoragePort, SignedUpload};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Supabase storage adapter: signed upload URLs for product images.
#[derive(Clone)]
pub struct SupabaseStorageAdapter {
    config: Arc<SupabaseConfig>,
    client: Client,
}

impl SupabaseStorageAdapter {
    pub fn new(config: Arc<SupabaseConfig>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ObjectStoragePort for SupabaseStorageAdapter {
    async fn create_signed_upload_url(&self) -> DomainResult<SignedUpload> {
        // Timestamp-named jpegs; the bucket is append-only from the
        // service's point of view.
        let path = format!("{}.jpeg", chrono::Utc::now().timestamp_millis());
        let url = format!(
            "{}/storage/v1/object/upload/sign/{}/{}",
            self.config.project_url, self.config.bucket, path
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.service_role_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::StorageError(format!(
                "Signed upload URL failed: {} - {}",
                status, error_text
            )));
        }

        let resp_json: serde_json::Value = response.json().await?;
        debug!("Signed upload response: {}", resp_json);

        let signed_path = resp_json["url"]
            .as_str()
            .ok_or_else(|| DomainError::StorageError("Missing url".to_string()))?;
        let token = resp_json["token"]
            .as_str()
            .ok_or_else(|| DomainError::StorageError("Missing token".to_string()))?;

        Ok(SignedUpload {
            url: format!("{}/storage/v1{}", self.config.project_url, signed_path),
            token: token.to_string(),
            path,
        })
    }
}
