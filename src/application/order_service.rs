use crate::application::dto::{
    CreateOrderRequest, CreateOrderResponse, OrderResponse, OrderStatusResponse,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::events::{DomainEvent, OrderCompleted, OrderCreated, OrderPaid};
use crate::domain::value_objects::Money;
use crate::domain::{Order, OrderItem};
use crate::ports::payment_provider_port::{PaymentCallback, QrPaymentRequest};
use crate::ports::{CatalogRepositoryPort, OrderRepositoryPort, PaymentProviderPort};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Callback event the provider sends once a QR payment settles.
const PAYMENT_SUCCEEDED_EVENT: &str = "payment.succeeded";

/// Order and payment orchestrator.
///
/// Owns the order lifecycle: pricing and persistence at creation, QR
/// issuance against the provider, payment confirmation via the provider
/// callback, and the cashier-driven transition to the terminal state.
pub struct OrderService<P: PaymentProviderPort, R: OrderRepositoryPort, C: CatalogRepositoryPort> {
    provider: Arc<P>,
    orders: Arc<R>,
    catalog: Arc<C>,
}

impl<P: PaymentProviderPort, R: OrderRepositoryPort, C: CatalogRepositoryPort>
    OrderService<P, R, C>
{
    pub fn new(provider: Arc<P>, orders: Arc<R>, catalog: Arc<C>) -> Self {
        Self {
            provider,
            orders,
            catalog,
        }
    }

    /// Creates an order from the requested items and issues a QR
    /// payment request for its grand total.
    ///
    /// Items referencing unknown products reject the whole order before
    /// anything is persisted. The order and its items are written in
    /// one transaction; if the provider call (or the linkage write
    /// after it) fails, the order is deleted again so no unpayable row
    /// survives.
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> DomainResult<CreateOrderResponse> {
        if request.items.is_empty() {
            return Err(DomainError::ValidationError(
                "Order must have at least one item".to_string(),
            ));
        }

        for item in &request.items {
            if item.quantity < 1 {
                return Err(DomainError::ValidationError(
                    "Order item quantity must be at least 1".to_string(),
                ));
            }
        }

        let product_ids: Vec<Uuid> = request.items.iter().map(|i| i.product_id).collect();
        let products = self.catalog.find_products_by_ids(&product_ids).await?;
        let products_by_id: HashMap<Uuid, _> =
            products.into_iter().map(|p| (p.id, p)).collect();

        let unknown: Vec<Uuid> = product_ids
            .iter()
            .filter(|id| !products_by_id.contains_key(id))
            .copied()
            .collect();
        if !unknown.is_empty() {
            return Err(DomainError::UnknownProducts(unknown));
        }

        let mut sub_total = Money::ZERO;
        for item in &request.items {
            let product = products_by_id
                .get(&item.product_id)
                .ok_or_else(|| DomainError::ProductNotFound(item.product_id.to_string()))?;
            let line_total = product
                .price
                .checked_mul(i64::from(item.quantity))
                .and_then(|t| sub_total.checked_add(t))
                .ok_or_else(|| {
                    DomainError::InvalidAmount("Order subtotal overflows".to_string())
                })?;
            sub_total = line_total;
        }

        let mut order = Order::new(sub_total)?;

        let items = request
            .items
            .iter()
            .map(|item| {
                let product = products_by_id
                    .get(&item.product_id)
                    .ok_or_else(|| DomainError::ProductNotFound(item.product_id.to_string()))?;
                // Price snapshot: later catalog edits must not reprice
                // this order.
                OrderItem::new(order.id, product.id, product.price, item.quantity)
            })
            .collect::<DomainResult<Vec<OrderItem>>>()?;

        self.orders.create_with_items(&order, &items).await?;
        debug!("Order persisted: {}", order.id);

        let qr_payment = match self
            .provider
            .create_qr_payment(QrPaymentRequest {
                amount: order.grand_total.as_rupiah(),
                reference_id: order.id,
            })
            .await
        {
            Ok(qr_payment) => qr_payment,
            Err(e) => {
                self.compensate_order(order.id).await;
                return Err(e);
            }
        };

        order.attach_payment(
            qr_payment.transaction_id.clone(),
            qr_payment.payment_method_id.clone(),
        );
        if let Err(e) = self.orders.update(&order).await {
            self.compensate_order(order.id).await;
            return Err(e);
        }

        let event = OrderCreated::from_order(&order, items.len());
        info!(
            event = event.event_type(),
            order_id = %order.id,
            grand_total = %order.grand_total,
            "Order created"
        );

        Ok(CreateOrderResponse {
            order: OrderResponse::from_order(&order),
            items,
            qr_string: qr_payment.qr_string,
        })
    }

    /// Test/demo hook: asks the provider to settle the order's payment
    /// method. Local state is untouched; it catches up through the
    /// callback (or polling).
    pub async fn simulate_payment(&self, order_id: Uuid) -> DomainResult<()> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::OrderNotFound(order_id.to_string()))?;

        let payment_method_id = order.payment_method_id.as_deref().ok_or_else(|| {
            DomainError::ValidationError("Order has no payment method".to_string())
        })?;

        info!("Simulating payment for order: {}", order_id);
        self.provider
            .simulate_payment(payment_method_id, order.grand_total.as_rupiah())
            .await
    }

    /// The polling read: has the order been paid yet?
    pub async fn check_order_status(&self, order_id: Uuid) -> DomainResult<OrderStatusResponse> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::OrderNotFound(order_id.to_string()))?;

        Ok(OrderStatusResponse {
            order_id: order.id,
            paid: order.is_paid(),
        })
    }

    /// Cashier action closing out a paid, processing order.
    pub async fn finish_order(&self, order_id: Uuid) -> DomainResult<OrderResponse> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::OrderNotFound(order_id.to_string()))?;

        order.finish()?;
        self.orders.update(&order).await?;

        let event = OrderCompleted::from_order(&order);
        info!(
            event = event.event_type(),
            order_id = %order.id,
            "Order finished"
        );

        Ok(OrderResponse::from_order(&order))
    }

    /// Provider callback: the out-of-band write path that sets
    /// `paid_at` and advances the order to `Processing`.
    pub async fn handle_payment_callback(
        &self,
        body: &str,
        signature: &str,
    ) -> DomainResult<()> {
        if !self.provider.verify_callback(body, signature).await? {
            return Err(DomainError::SignatureVerificationFailed);
        }

        let callback: PaymentCallback = serde_json::from_str(body)?;

        if callback.event != PAYMENT_SUCCEEDED_EVENT {
            debug!("Ignoring callback event: {}", callback.event);
            return Ok(());
        }

        let order_id = callback.data.reference_id;
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::OrderNotFound(order_id.to_string()))?;

        if order.is_paid() {
            // Providers redeliver callbacks; the first one won.
            debug!("Order already paid, acknowledging replay: {}", order_id);
            return Ok(());
        }

        order.mark_paid()?;
        self.orders.update(&order).await?;

        let event = OrderPaid::from_order(&order);
        info!(
            event = event.event_type(),
            order_id = %order.id,
            "Payment confirmed"
        );

        Ok(())
    }

    /// Best-effort removal of an order whose payment request never got
    /// off the ground. A failure here is logged and swallowed: the
    /// caller is already propagating the provider error.
    async fn compensate_order(&self, order_id: Uuid) {
        warn!("Compensating failed payment request, deleting order: {}", order_id);
        if let Err(e) = self.orders.delete(order_id).await {
            error!("Compensation failed, order left without payment linkage: {}: {}", order_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::OrderItemInput;
    use crate::application::test_support::{
        seed_product, InMemoryCatalog, InMemoryOrders, StubProvider,
    };
    use crate::domain::value_objects::OrderStatus;

    fn service(
        provider: Arc<StubProvider>,
        orders: Arc<InMemoryOrders>,
        catalog: Arc<InMemoryCatalog>,
    ) -> OrderService<StubProvider, InMemoryOrders, InMemoryCatalog> {
        OrderService::new(provider, orders, catalog)
    }

    fn one_item(product_id: Uuid, quantity: i32) -> CreateOrderRequest {
        CreateOrderRequest {
            items: vec![OrderItemInput {
                product_id,
                quantity,
            }],
        }
    }

    fn paid_callback(order_id: Uuid) -> String {
        format!(
            r#"{{"event":"payment.succeeded","data":{{"reference_id":"{order_id}","payment_method_id":"pm-test-1","amount":22000}}}}"#
        )
    }

    #[tokio::test]
    async fn test_create_order_prices_and_links_payment() {
        let provider = Arc::new(StubProvider::new());
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let product = seed_product(&catalog, "Kopi Susu", 10000);
        let service = service(provider, orders.clone(), catalog);

        let response = service.create_order(one_item(product.id, 2)).await.unwrap();

        assert_eq!(response.order.sub_total, Money::from_rupiah(20000));
        assert_eq!(response.order.tax, Money::from_rupiah(2000));
        assert_eq!(response.order.grand_total, Money::from_rupiah(22000));
        assert_eq!(response.order.status, OrderStatus::AwaitingPayment);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].price, Money::from_rupiah(10000));
        assert!(!response.qr_string.is_empty());

        let stored = orders.get(response.order.id).unwrap();
        assert_eq!(stored.payment_method_id.as_deref(), Some("pm-test-1"));
        assert_eq!(stored.external_transaction_id.as_deref(), Some("pr-test-1"));
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_item_list_without_persistence() {
        let provider = Arc::new(StubProvider::new());
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let service = service(provider.clone(), orders.clone(), catalog);

        let result = service
            .create_order(CreateOrderRequest { items: vec![] })
            .await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        assert_eq!(orders.len(), 0);
        assert_eq!(provider.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_order_rejects_zero_quantity() {
        let provider = Arc::new(StubProvider::new());
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let product = seed_product(&catalog, "Kopi Susu", 10000);
        let service = service(provider, orders.clone(), catalog);

        let result = service.create_order(one_item(product.id, 0)).await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        assert_eq!(orders.len(), 0);
    }

    #[tokio::test]
    async fn test_create_order_rejects_unknown_products() {
        let provider = Arc::new(StubProvider::new());
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let product = seed_product(&catalog, "Kopi Susu", 10000);
        let service = service(provider, orders.clone(), catalog);

        let ghost = Uuid::new_v4();
        let request = CreateOrderRequest {
            items: vec![
                OrderItemInput {
                    product_id: product.id,
                    quantity: 1,
                },
                OrderItemInput {
                    product_id: ghost,
                    quantity: 1,
                },
            ],
        };

        match service.create_order(request).await {
            Err(DomainError::UnknownProducts(ids)) => assert_eq!(ids, vec![ghost]),
            other => panic!("expected UnknownProducts, got {other:?}"),
        }
        assert_eq!(orders.len(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_compensates_persisted_order() {
        let provider = Arc::new(StubProvider::new());
        provider.fail_next_create();
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let product = seed_product(&catalog, "Kopi Susu", 10000);
        let service = service(provider, orders.clone(), catalog);

        let result = service.create_order(one_item(product.id, 1)).await;

        assert!(matches!(result, Err(DomainError::PaymentProviderError(_))));
        // Compensation removed the already-committed order.
        assert_eq!(orders.len(), 0);
    }

    #[tokio::test]
    async fn test_simulate_payment_requires_known_linked_order() {
        let provider = Arc::new(StubProvider::new());
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let product = seed_product(&catalog, "Kopi Susu", 10000);
        let service = service(provider.clone(), orders.clone(), catalog);

        assert!(matches!(
            service.simulate_payment(Uuid::new_v4()).await,
            Err(DomainError::OrderNotFound(_))
        ));

        let response = service.create_order(one_item(product.id, 1)).await.unwrap();
        service.simulate_payment(response.order.id).await.unwrap();
        assert!(provider.was_simulated("pm-test-1"));
    }

    #[tokio::test]
    async fn test_callback_rejects_bad_signature() {
        let provider = Arc::new(StubProvider::new());
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let service = service(provider, orders, catalog);

        let result = service
            .handle_payment_callback(&paid_callback(Uuid::new_v4()), "forged")
            .await;

        assert!(matches!(
            result,
            Err(DomainError::SignatureVerificationFailed)
        ));
    }

    #[tokio::test]
    async fn test_full_lifecycle_create_pay_finish() {
        let provider = Arc::new(StubProvider::new());
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let product = seed_product(&catalog, "Kopi Susu", 10000);
        let service = service(provider, orders.clone(), catalog);

        let response = service.create_order(one_item(product.id, 2)).await.unwrap();
        let order_id = response.order.id;

        // Not paid yet; finishing is premature.
        assert!(!service.check_order_status(order_id).await.unwrap().paid);
        assert!(matches!(
            service.finish_order(order_id).await,
            Err(DomainError::ValidationError(_))
        ));

        service.simulate_payment(order_id).await.unwrap();
        service
            .handle_payment_callback(&paid_callback(order_id), StubProvider::VALID_SIGNATURE)
            .await
            .unwrap();

        assert!(service.check_order_status(order_id).await.unwrap().paid);
        assert_eq!(
            orders.get(order_id).unwrap().status,
            OrderStatus::Processing
        );

        // Replayed callback acks without a second transition.
        service
            .handle_payment_callback(&paid_callback(order_id), StubProvider::VALID_SIGNATURE)
            .await
            .unwrap();

        let finished = service.finish_order(order_id).await.unwrap();
        assert_eq!(finished.status, OrderStatus::Done);

        // Second finish: status is no longer PROCESSING.
        assert!(matches!(
            service.finish_order(order_id).await,
            Err(DomainError::InvalidState { .. })
        ));
        assert!(matches!(
            service.finish_order(Uuid::new_v4()).await,
            Err(DomainError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_callback_for_unknown_event_is_acknowledged() {
        let provider = Arc::new(StubProvider::new());
        let orders = Arc::new(InMemoryOrders::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let service = service(provider, orders, catalog);

        let body = r#"{"event":"payment.failed","data":{"reference_id":"00000000-0000-0000-0000-000000000000","payment_method_id":null,"amount":null}}"#;
        service
            .handle_payment_callback(body, StubProvider::VALID_SIGNATURE)
            .await
            .unwrap();
    }
}
