use super::auth::require_bearer_token;
use super::handlers::*;
use crate::infrastructure::AuthConfig;
use crate::ports::{
    CatalogRepositoryPort, ObjectStoragePort, OrderRepositoryPort, PaymentProviderPort,
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    state: AppState<P, R, C, S>,
    auth: Arc<AuthConfig>,
) -> Router {
    let protected = Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/:id",
            put(rename_category).delete(delete_category),
        )
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(edit_product).delete(delete_product),
        )
        .route(
            "/api/products/image-upload-url",
            post(create_product_image_upload_url),
        )
        .route("/api/carts/:session", get(get_cart).delete(clear_cart))
        .route("/api/carts/:session/items", post(add_cart_item))
        .route(
            "/api/carts/:session/items/:product_id",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route("/api/carts/:session/checkout", post(checkout_cart))
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/:id/status", get(check_order_status))
        .route("/api/orders/:id/simulate-payment", post(simulate_payment))
        .route("/api/orders/:id/finish", post(finish_order))
        .route("/api/reports/sales", get(sales_report))
        .route_layer(middleware::from_fn_with_state(auth, require_bearer_token));

    let public = Router::new()
        .route("/health", get(health_check))
        .route("/api/webhooks/payment", post(payment_webhook));

    protected
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
