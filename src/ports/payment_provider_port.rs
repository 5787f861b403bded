use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// QR payment request issued against the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrPaymentRequest {
    /// Grand total in rupiah.
    pub amount: i64,

    /// The order id, echoed back by the provider in callbacks.
    pub reference_id: Uuid,
}

/// Provider response for a QR payment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrPayment {
    pub transaction_id: String,
    pub payment_method_id: String,

    /// The scannable QRIS payload, rendered by the presentation layer.
    pub qr_string: String,
}

/// Provider payment callback, delivered to the webhook endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCallback {
    pub event: String,
    pub data: PaymentCallbackData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCallbackData {
    /// Our order id, as passed in `QrPaymentRequest::reference_id`.
    pub reference_id: Uuid,
    pub payment_method_id: Option<String>,
    pub amount: Option<i64>,
}

/// Payment provider port.
#[async_trait]
pub trait PaymentProviderPort: Send + Sync + 'static {
    /// Issues a QR payment request for one order's grand total.
    async fn create_qr_payment(&self, request: QrPaymentRequest) -> DomainResult<QrPayment>;

    /// Test/demo hook: asks the provider to mark the payment method as
    /// paid. Local order state catches up via the callback or polling.
    async fn simulate_payment(&self, payment_method_id: &str, amount: i64) -> DomainResult<()>;

    /// Verifies the callback signature over the raw body.
    async fn verify_callback(&self, body: &str, signature: &str) -> DomainResult<bool>;
}
