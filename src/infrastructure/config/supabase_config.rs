use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Supabase storage configuration for product images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub project_url: String,

    /// Service-role key used for signing upload URLs.
    pub service_role_key: String,

    /// Bucket holding product images.
    pub bucket: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self {
            project_url: std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set"),
            service_role_key: std::env::var("SUPABASE_SERVICE_ROLE_KEY")
                .expect("SUPABASE_SERVICE_ROLE_KEY must be set"),
            bucket: std::env::var("SUPABASE_PRODUCT_IMAGE_BUCKET")
                .unwrap_or_else(|_| "product-images".to_string()),
        })
    }
}
