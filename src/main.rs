mod api;
mod application;
mod domain;
mod infrastructure;
mod ports;

use api::AppState;
use application::{CartStore, CatalogService, OrderService, ReportService};
use infrastructure::{
    AuthConfig, MySqlCatalogRepository, MySqlOrderRepository, SupabaseConfig,
    SupabaseStorageAdapter, XenditAdapter, XenditConfig,
};
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    info!("Starting POS API...");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    info!("Connecting to database...");

    let pool = Arc::new(MySqlPool::connect(&database_url).await?);
    sqlx::migrate!("./migrations").run(pool.as_ref()).await?;
    info!("Database connected and migrated");

    let xendit_config = XenditConfig::from_env();
    let supabase_config = SupabaseConfig::from_env();
    let auth_config = AuthConfig::from_env();

    let payment_provider = Arc::new(XenditAdapter::new(xendit_config));
    let storage = Arc::new(SupabaseStorageAdapter::new(supabase_config));
    let order_repository = Arc::new(MySqlOrderRepository::new(pool.clone()));
    let catalog_repository = Arc::new(MySqlCatalogRepository::new(pool.clone()));

    let order_service = Arc::new(OrderService::new(
        payment_provider,
        order_repository.clone(),
        catalog_repository.clone(),
    ));
    let catalog_service = Arc::new(CatalogService::new(catalog_repository, storage));
    let report_service = Arc::new(ReportService::new(order_repository));

    let app_state = AppState {
        order_service,
        catalog_service,
        report_service,
        cart_store: Arc::new(CartStore::new()),
    };

    let app = api::create_router(app_state, auth_config);

    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET    /health - Health check");
    info!("  GET    /api/categories - List categories with product counts");
    info!("  POST   /api/categories - Create category");
    info!("  PUT    /api/categories/:id - Rename category");
    info!("  DELETE /api/categories/:id - Delete category");
    info!("  GET    /api/products - List products (category/search filters)");
    info!("  POST   /api/products - Create product");
    info!("  GET    /api/products/:id - Get product");
    info!("  PUT    /api/products/:id - Edit product");
    info!("  DELETE /api/products/:id - Delete product");
    info!("  POST   /api/products/image-upload-url - Signed image upload slot");
    info!("  GET    /api/carts/:session - Current cart");
    info!("  POST   /api/carts/:session/items - Add product to cart");
    info!("  PUT    /api/carts/:session/items/:product_id - Set line quantity");
    info!("  DELETE /api/carts/:session/items/:product_id - Remove line");
    info!("  DELETE /api/carts/:session - Clear cart");
    info!("  POST   /api/carts/:session/checkout - Checkout cart into an order");
    info!("  POST   /api/orders - Create order with QR payment");
    info!("  GET    /api/orders - List orders (status filter)");
    info!("  GET    /api/orders/:id/status - Payment status poll");
    info!("  POST   /api/orders/:id/simulate-payment - Simulate QR payment");
    info!("  POST   /api/orders/:id/finish - Mark order done");
    info!("  POST   /api/webhooks/payment - Provider payment callback");
    info!("  GET    /api/reports/sales - Sales report");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
