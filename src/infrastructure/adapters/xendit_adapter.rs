use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::config::xendit_config::XenditConfig;
use crate::ports::payment_provider_port::{
    PaymentProviderPort, QrPayment, QrPaymentRequest,
};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, error};

type HmacSha256 = Hmac<Sha256>;

/// Xendit payment-provider adapter. Issues QRIS payment requests and
/// verifies callback signatures.
#[derive(Clone)]
pub struct XenditAdapter {
    config: Arc<XenditConfig>,
    client: Client,
}

impl XenditAdapter {
    pub fn new(config: Arc<XenditConfig>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentProviderPort for XenditAdapter {
    async fn create_qr_payment(&self, request: QrPaymentRequest) -> DomainResult<QrPayment> {
        let url = format!("{}/payment_requests", self.config.base_url);

        let body = json!({
            "amount": request.amount,
            "currency": "IDR",
            "reference_id": request.reference_id,
            "payment_method": {
                "type": "QR_CODE",
                "reusability": "ONE_TIME_USE",
                "qr_code": {
                    "channel_code": "QRIS"
                }
            }
        });

        debug!("QR payment request body: {}", body);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.api_key, Some(""))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Payment provider error: {} - {}", status, error_text);
            return Err(DomainError::PaymentProviderError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let resp_json: serde_json::Value = response.json().await?;
        debug!("QR payment response: {}", resp_json);

        let transaction_id = resp_json["id"]
            .as_str()
            .ok_or_else(|| DomainError::PaymentProviderError("Missing id".to_string()))?;

        let payment_method_id = resp_json["payment_method"]["id"].as_str().ok_or_else(|| {
            DomainError::PaymentProviderError("Missing payment_method.id".to_string())
        })?;

        let qr_string = resp_json["payment_method"]["qr_code"]["channel_properties"]["qr_string"]
            .as_str()
            .ok_or_else(|| DomainError::PaymentProviderError("Missing qr_string".to_string()))?;

        Ok(QrPayment {
            transaction_id: transaction_id.to_string(),
            payment_method_id: payment_method_id.to_string(),
            qr_string: qr_string.to_string(),
        })
    }

    async fn simulate_payment(&self, payment_method_id: &str, amount: i64) -> DomainResult<()> {
        let url = format!(
            "{}/payment_methods/{}/payments/simulate",
            self.config.base_url, payment_method_id
        );

        let body = json!({ "amount": amount });

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.api_key, Some(""))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::PaymentProviderError(format!(
                "Simulate payment failed: {} - {}",
                status, error_text
            )));
        }

        Ok(())
    }

    /// HMAC-SHA256 over the raw callback body, keyed with the callback
    /// token, hex-encoded in the signature header.
    async fn verify_callback(&self, body: &str, signature: &str) -> DomainResult<bool> {
        let mut mac = HmacSha256::new_from_slice(self.config.callback_token.as_bytes())
            .map_err(|e| DomainError::InternalError(format!("HMAC init error: {e}")))?;
        mac.update(body.as_bytes());

        let Ok(expected) = hex::decode(signature) else {
            return Ok(false);
        };

        Ok(mac.verify_slice(&expected).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> XenditAdapter {
        XenditAdapter::new(Arc::new(XenditConfig {
            api_key: "xnd_test_key".to_string(),
            callback_token: "callback-secret".to_string(),
            base_url: "https://api.xendit.co".to_string(),
        }))
    }

    fn sign(token: &str, body: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(token.as_bytes()).unwrap();
        mac.update(body.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[tokio::test]
    async fn test_verify_callback_accepts_valid_signature() {
        let adapter = adapter();
        let body = r#"{"event":"payment.succeeded"}"#;
        let signature = sign("callback-secret", body);

        assert!(adapter.verify_callback(body, &signature).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_callback_rejects_tampered_body() {
        let adapter = adapter();
        let signature = sign("callback-secret", r#"{"event":"payment.succeeded"}"#);

        assert!(!adapter
            .verify_callback(r#"{"event":"payment.failed"}"#, &signature)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_verify_callback_rejects_non_hex_signature() {
        let adapter = adapter();

        assert!(!adapter.verify_callback("{}", "not-hex!").await.unwrap());
    }
}
