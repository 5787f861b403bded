use crate::application::dto::{
    AddToCartRequest, CartResponse, CreateCategoryRequest, CreateOrderRequest, ErrorResponse,
    ProductListQuery, ProductPayload, RenameCategoryRequest, UpdateCartItemRequest,
};
use crate::application::{CartStore, CatalogService, OrderService, ReportService};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::OrderStatusFilter;
use crate::ports::catalog_repository_port::ProductFilter;
use crate::ports::{
    CatalogRepositoryPort, ObjectStoragePort, OrderRepositoryPort, PaymentProviderPort,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Application state shared by all handlers.
pub struct AppState<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
> {
    pub order_service: Arc<OrderService<P, R, C>>,
    pub catalog_service: Arc<CatalogService<C, S>>,
    pub report_service: Arc<ReportService<R>>,
    pub cart_store: Arc<CartStore>,
}

impl<
        P: PaymentProviderPort,
        R: OrderRepositoryPort,
        C: CatalogRepositoryPort,
        S: ObjectStoragePort,
    > Clone for AppState<P, R, C, S>
{
    fn clone(&self) -> Self {
        Self {
            order_service: self.order_service.clone(),
            catalog_service: self.catalog_service.clone(),
            report_service: self.report_service.clone(),
            cart_store: self.cart_store.clone(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Maps the domain taxonomy onto HTTP statuses.
fn error_response(e: DomainError) -> ApiError {
    let (status, code) = match &e {
        DomainError::ValidationError(_)
        | DomainError::InvalidAmount(_)
        | DomainError::UnknownProducts(_)
        | DomainError::InvalidState { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        DomainError::OrderNotFound(_)
        | DomainError::ProductNotFound(_)
        | DomainError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        DomainError::CategoryInUse(_) => (StatusCode::CONFLICT, "CATEGORY_IN_USE"),
        DomainError::SignatureVerificationFailed => {
            (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE")
        }
        DomainError::SerializationError(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        DomainError::PaymentProviderError(_) | DomainError::HttpError(_) => {
            (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR")
        }
        DomainError::StorageError(_) => (StatusCode::BAD_GATEWAY, "STORAGE_ERROR"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    if status.is_server_error() {
        error!("Request failed: {}", e);
    }

    (
        status,
        Json(ErrorResponse::new(code.to_string(), e.to_string())),
    )
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

// ---- Categories ----

pub async fn list_categories<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .list_categories()
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn create_category<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .create_category(request.name)
        .await
        .map(|category| (StatusCode::CREATED, Json(category)))
        .map_err(error_response)
}

pub async fn rename_category<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(id): Path<Uuid>,
    Json(request): Json<RenameCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .rename_category(id, request.name)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn delete_category<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .delete_category(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

// ---- Products ----

fn parse_product_filter(query: ProductListQuery) -> Result<ProductFilter, ApiError> {
    let category_id = match query.category_id.as_deref() {
        None | Some("ALL") => None,
        Some(raw) => Some(raw.parse::<Uuid>().map_err(|_| {
            error_response(DomainError::ValidationError(format!(
                "Invalid category id: {raw}"
            )))
        })?),
    };

    Ok(ProductFilter {
        category_id,
        search: query.search.filter(|s| !s.is_empty()),
    })
}

pub async fn list_products<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = parse_product_filter(query)?;
    state
        .catalog_service
        .list_products(filter)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_product<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .get_product(id)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn create_product<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .create_product(payload)
        .await
        .map(|product| (StatusCode::CREATED, Json(product)))
        .map_err(error_response)
}

pub async fn edit_product<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .edit_product(id, payload)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn delete_product<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .delete_product(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

pub async fn create_product_image_upload_url<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service
        .create_image_upload_url()
        .await
        .map(|upload| (StatusCode::CREATED, Json(upload)))
        .map_err(error_response)
}

// ---- Cart ----

pub async fn get_cart<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(session): Path<String>,
) -> impl IntoResponse {
    let cart = state.cart_store.snapshot(&session);
    Json(CartResponse::from_cart(&cart))
}

pub async fn add_cart_item<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(session): Path<String>,
    Json(request): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Snapshot the live product into the cart line.
    let product = state
        .catalog_service
        .get_product(request.product_id)
        .await
        .map_err(error_response)?;

    state.cart_store.add_item(&session, &product);
    let cart = state.cart_store.snapshot(&session);
    Ok((StatusCode::CREATED, Json(CartResponse::from_cart(&cart))))
}

pub async fn update_cart_item<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path((session, product_id)): Path<(String, Uuid)>,
    Json(request): Json<UpdateCartItemRequest>,
) -> impl IntoResponse {
    state
        .cart_store
        .update_quantity(&session, product_id, request.quantity);
    let cart = state.cart_store.snapshot(&session);
    Json(CartResponse::from_cart(&cart))
}

pub async fn remove_cart_item<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path((session, product_id)): Path<(String, Uuid)>,
) -> impl IntoResponse {
    state.cart_store.remove_item(&session, product_id);
    let cart = state.cart_store.snapshot(&session);
    Json(CartResponse::from_cart(&cart))
}

pub async fn clear_cart<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(session): Path<String>,
) -> impl IntoResponse {
    state.cart_store.clear(&session);
    StatusCode::NO_CONTENT
}

/// Turns the session cart into an order. The cart is left untouched
/// either way: the client clears it once payment is confirmed.
pub async fn checkout_cart<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(session): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = state.cart_store.snapshot(&session);
    let request = CreateOrderRequest {
        items: cart
            .items()
            .iter()
            .map(|line| crate::application::dto::OrderItemInput {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect(),
    };

    info!("Checkout for session: {}", session);

    state
        .order_service
        .create_order(request)
        .await
        .map(|response| (StatusCode::CREATED, Json(response)))
        .map_err(error_response)
}

// ---- Orders ----

pub async fn create_order<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received order creation request ({} items)", request.items.len());

    state
        .order_service
        .create_order(request)
        .await
        .map(|response| (StatusCode::CREATED, Json(response)))
        .map_err(error_response)
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: OrderStatusFilter,
}

pub async fn list_orders<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .report_service
        .list_orders(query.status)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn check_order_status<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .order_service
        .check_order_status(id)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn simulate_payment<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received payment simulation request: {}", id);

    state
        .order_service
        .simulate_payment(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

pub async fn finish_order<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received finish request: {}", id);

    state
        .order_service
        .finish_order(id)
        .await
        .map(Json)
        .map_err(error_response)
}

// ---- Webhook ----

/// Provider payment callback. Authenticated by its HMAC signature, not
/// the bearer token; this route sits outside the auth gate.
pub async fn payment_webhook<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
    headers: axum::http::HeaderMap,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received payment callback");

    let signature = headers
        .get("x-callback-signature")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "INVALID_SIGNATURE".to_string(),
                    "Missing x-callback-signature".to_string(),
                )),
            )
        })?;

    state
        .order_service
        .handle_payment_callback(&body, signature)
        .await
        .map(|_| (StatusCode::OK, Json(serde_json::json!({ "received": true }))))
        .map_err(error_response)
}

// ---- Reports ----

pub async fn sales_report<
    P: PaymentProviderPort,
    R: OrderRepositoryPort,
    C: CatalogRepositoryPort,
    S: ObjectStoragePort,
>(
    State(state): State<AppState<P, R, C, S>>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .report_service
        .sales_report()
        .await
        .map(Json)
        .map_err(error_response)
}
