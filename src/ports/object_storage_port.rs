use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A one-shot signed upload slot in the image bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUpload {
    /// Absolute URL the client PUTs the image to.
    pub url: String,

    /// Upload token accompanying the PUT.
    pub token: String,

    /// Object path within the bucket; becomes the product image URL.
    pub path: String,
}

/// Object storage port for product images.
#[async_trait]
pub trait ObjectStoragePort: Send + Sync + 'static {
    async fn create_signed_upload_url(&self) -> DomainResult<SignedUpload>;
}
