use crate::application::dto::SalesReportResponse;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::OrderStatusFilter;
use crate::ports::order_repository_port::OrderSummary;
use crate::ports::OrderRepositoryPort;
use std::sync::Arc;

/// Read-only projection over persisted orders. Nothing here is cached;
/// every call recomputes from the store.
pub struct ReportService<R: OrderRepositoryPort> {
    orders: Arc<R>,
}

impl<R: OrderRepositoryPort> ReportService<R> {
    pub fn new(orders: Arc<R>) -> Self {
        Self { orders }
    }

    /// Revenue and status counts. The three reads fan out concurrently
    /// and join before the response is assembled.
    pub async fn sales_report(&self) -> DomainResult<SalesReportResponse> {
        let (total_revenue, total_ongoing_orders, total_completed_orders) = tokio::try_join!(
            self.orders.sum_paid_grand_total(),
            self.orders.count_ongoing(),
            self.orders.count_completed(),
        )?;

        Ok(SalesReportResponse {
            total_revenue,
            total_ongoing_orders,
            total_completed_orders,
        })
    }

    pub async fn list_orders(&self, filter: OrderStatusFilter) -> DomainResult<Vec<OrderSummary>> {
        self.orders.list(filter).await
    }
}
