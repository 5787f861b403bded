use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{Money, OrderStatus, OrderStatusFilter};
use crate::domain::{Order, OrderItem};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the order listing: enough for the sales board, not the
/// full order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: Uuid,
    pub grand_total: Money,
    pub status: OrderStatus,
    pub item_count: i64,
}

/// Order persistence port.
#[async_trait]
pub trait OrderRepositoryPort: Send + Sync + 'static {
    /// Persists an order together with its items in one transaction.
    async fn create_with_items(&self, order: &Order, items: &[OrderItem]) -> DomainResult<()>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Order>>;

    /// Writes status, `paid_at`, and payment linkage back to the row.
    async fn update(&self, order: &Order) -> DomainResult<()>;

    /// Compensation for a failed payment-request step: removes the
    /// order and its items.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    async fn list(&self, filter: OrderStatusFilter) -> DomainResult<Vec<OrderSummary>>;

    /// Σ grand_total over orders with `paid_at` set.
    async fn sum_paid_grand_total(&self) -> DomainResult<Money>;

    /// Count of orders not yet in the terminal state.
    async fn count_ongoing(&self) -> DomainResult<i64>;

    /// Count of orders in the terminal state.
    async fn count_completed(&self) -> DomainResult<i64>;
}
