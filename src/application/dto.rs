use crate::domain::cart::{Cart, CartItem};
use crate::domain::value_objects::{Money, OrderStatus};
use crate::domain::{Order, OrderItem};
use crate::ports::catalog_repository_port::CategoryWithCount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create-order request: product references plus quantities.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Order as returned to the presentation layer.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub sub_total: Money,
    pub tax: Money,
    pub grand_total: Money,
    pub status: OrderStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OrderResponse {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id,
            sub_total: order.sub_total,
            tax: order.tax,
            grand_total: order.grand_total,
            status: order.status,
            paid_at: order.paid_at,
            created_at: order.created_at,
        }
    }
}

/// Create-order response: the persisted order, its items, and the QR
/// payload to render.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItem>,
    pub qr_string: String,
}

/// Result of the payment-status poll.
#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub order_id: Uuid,
    pub paid: bool,
}

/// Sales dashboard aggregates.
#[derive(Debug, Serialize)]
pub struct SalesReportResponse {
    pub total_revenue: Money,
    pub total_ongoing_orders: i64,
    pub total_completed_orders: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameCategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub product_count: i64,
}

impl CategoryResponse {
    pub fn from_with_count(c: CategoryWithCount) -> Self {
        Self {
            id: c.category.id,
            name: c.category.name,
            product_count: c.product_count,
        }
    }
}

/// Create/edit product payload.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub price: i64,
    pub category_id: Uuid,
    pub image_url: Option<String>,
}

/// Product listing query. `category_id` is `"ALL"` or a category uuid.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// Cart with its derived totals.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub sub_total: Money,
    pub tax: Money,
    pub grand_total: Money,
}

impl CartResponse {
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            sub_total: cart.sub_total(),
            tax: cart.tax(),
            grand_total: cart.grand_total(),
        }
    }
}

/// Error body rendered by every failing handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self { error, message }
    }
}
