use std::sync::Arc;

/// Bearer token the presentation layer authenticates with. Requests
/// missing it never reach the services.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub api_token: String,
}

impl AuthConfig {
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self {
            api_token: std::env::var("API_TOKEN").expect("API_TOKEN must be set"),
        })
    }
}
