use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Xendit payment-provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XenditConfig {
    /// Secret API key, sent as the basic-auth username.
    pub api_key: String,

    /// Shared secret for callback signature verification.
    pub callback_token: String,

    /// API base URL.
    pub base_url: String,
}

impl XenditConfig {
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self {
            api_key: std::env::var("XENDIT_API_KEY").expect("XENDIT_API_KEY must be set"),
            callback_token: std::env::var("XENDIT_CALLBACK_TOKEN")
                .expect("XENDIT_CALLBACK_TOKEN must be set"),
            base_url: std::env::var("XENDIT_BASE_URL")
                .unwrap_or_else(|_| "https://api.xendit.co".to_string()),
        })
    }
}
