use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, OrderStatus, OrderStatusFilter};
use crate::domain::{Order, OrderItem};
use crate::ports::order_repository_port::{OrderRepositoryPort, OrderSummary};
use async_trait::async_trait;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// MySQL order repository.
#[derive(Clone)]
pub struct MySqlOrderRepository {
    pool: Arc<Pool<MySql>>,
}

impl MySqlOrderRepository {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepositoryPort for MySqlOrderRepository {
    /// Order and items land in one transaction; a failure in either
    /// leaves no partial rows behind.
    async fn create_with_items(&self, order: &Order, items: &[OrderItem]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        let order_query = r#"
            INSERT INTO orders (
                id, sub_total, tax, grand_total, status,
                external_transaction_id, payment_method_id,
                paid_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(order_query)
            .bind(order.id)
            .bind(order.sub_total.as_rupiah())
            .bind(order.tax.as_rupiah())
            .bind(order.grand_total.as_rupiah())
            .bind(order.status.to_string())
            .bind(&order.external_transaction_id)
            .bind(&order.payment_method_id)
            .bind(order.paid_at)
            .bind(order.created_at)
            .bind(order.updated_at)
            .execute(&mut *tx)
            .await?;

        let item_query = r#"
            INSERT INTO order_items (id, order_id, product_id, price, quantity)
            VALUES (?, ?, ?, ?, ?)
        "#;

        for item in items {
            sqlx::query(item_query)
                .bind(item.id)
                .bind(item.order_id)
                .bind(item.product_id)
                .bind(item.price.as_rupiah())
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!("Order saved with {} items: {}", items.len(), order.id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Order>> {
        let query = r#"
            SELECT id, sub_total, tax, grand_total, status,
                   external_transaction_id, payment_method_id,
                   paid_at, created_at, updated_at
            FROM orders
            WHERE id = ?
        "#;

        let result = sqlx::query_as::<_, OrderRow>(query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        result.map(OrderRow::into_order).transpose()
    }

    async fn update(&self, order: &Order) -> DomainResult<()> {
        let query = r#"
            UPDATE orders
            SET status = ?, external_transaction_id = ?, payment_method_id = ?,
                paid_at = ?, updated_at = ?
            WHERE id = ?
        "#;

        let rows_affected = sqlx::query(query)
            .bind(order.status.to_string())
            .bind(&order.external_transaction_id)
            .bind(&order.payment_method_id)
            .bind(order.paid_at)
            .bind(order.updated_at)
            .bind(order.id)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            error!("No order found to update: {}", order.id);
            return Err(DomainError::OrderNotFound(order.id.to_string()));
        }

        debug!("Order updated: {}", order.id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let rows_affected = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if rows_affected == 0 {
            return Err(DomainError::OrderNotFound(id.to_string()));
        }

        debug!("Order deleted: {}", id);
        Ok(())
    }

    async fn list(&self, filter: OrderStatusFilter) -> DomainResult<Vec<OrderSummary>> {
        let base = r#"
            SELECT o.id, o.grand_total, o.status, COUNT(oi.id) AS item_count
            FROM orders o
            LEFT JOIN order_items oi ON oi.order_id = o.id
        "#;

        let rows = match filter.as_status() {
            Some(status) => {
                let query = format!(
                    "{base} WHERE o.status = ? \
                     GROUP BY o.id, o.grand_total, o.status, o.created_at \
                     ORDER BY o.created_at DESC"
                );
                sqlx::query_as::<_, OrderSummaryRow>(&query)
                    .bind(status.to_string())
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
            None => {
                let query = format!(
                    "{base} GROUP BY o.id, o.grand_total, o.status, o.created_at \
                     ORDER BY o.created_at DESC"
                );
                sqlx::query_as::<_, OrderSummaryRow>(&query)
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
        };

        rows.into_iter().map(OrderSummaryRow::into_summary).collect()
    }

    async fn sum_paid_grand_total(&self) -> DomainResult<Money> {
        // SUM over BIGINT yields DECIMAL in MySQL, hence the cast.
        let total: i64 = sqlx::query_scalar(
            "SELECT CAST(COALESCE(SUM(grand_total), 0) AS SIGNED) \
             FROM orders WHERE paid_at IS NOT NULL",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Money::from_rupiah(total))
    }

    async fn count_ongoing(&self) -> DomainResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status <> ?")
            .bind(OrderStatus::Done.to_string())
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_completed(&self) -> DomainResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ?")
            .bind(OrderStatus::Done.to_string())
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    sub_total: i64,
    tax: i64,
    grand_total: i64,
    status: String,
    external_transaction_id: Option<String>,
    payment_method_id: Option<String>,
    paid_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl OrderRow {
    fn into_order(self) -> DomainResult<Order> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(DomainError::InternalError)?;

        Ok(Order {
            id: self.id,
            sub_total: Money::from_rupiah(self.sub_total),
            tax: Money::from_rupiah(self.tax),
            grand_total: Money::from_rupiah(self.grand_total),
            status,
            external_transaction_id: self.external_transaction_id,
            payment_method_id: self.payment_method_id,
            paid_at: self.paid_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    id: Uuid,
    grand_total: i64,
    status: String,
    item_count: i64,
}

impl OrderSummaryRow {
    fn into_summary(self) -> DomainResult<OrderSummary> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(DomainError::InternalError)?;

        Ok(OrderSummary {
            id: self.id,
            grand_total: Money::from_rupiah(self.grand_total),
            status,
            item_count: self.item_count,
        })
    }
}
