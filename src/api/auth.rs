use crate::application::dto::ErrorResponse;
use crate::infrastructure::AuthConfig;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Bearer-token gate for the management routes. The payment webhook is
/// excluded; it authenticates with its own callback signature.
pub async fn require_bearer_token(
    State(config): State<Arc<AuthConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .is_some_and(|token| token == config.api_token);

    if !authorized {
        warn!("Rejected request with missing or invalid bearer token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "UNAUTHORIZED".to_string(),
                "Missing or invalid bearer token".to_string(),
            )),
        )
            .into_response();
    }

    next.run(request).await
}
