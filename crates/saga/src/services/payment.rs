//! Payment service over the outbound gateway binding.
//!
//! Translates gateway results into a three-way charge outcome:
//! accepted, declined (business failure), or a transport-level
//! gateway error the caller may retry against the same idempotency
//! key.

use std::collections::HashMap;

use domain::Order;
use uuid::Uuid;

use crate::error::{Result, SagaError};
use crate::gateway::{ChargeRequest, GatewayError, OP_CHARGE, OP_REFUND, PaymentGateway};

/// Injected payment configuration.
///
/// The source token identifies the payment credential at the
/// processor. Real deployments inject a real token here; tests inject
/// one of the gateway's fixed test tokens. Test tokens are never
/// embedded in this service.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub source_token: String,
    pub currency: String,
}

impl PaymentConfig {
    /// Creates a payment configuration.
    pub fn new(source_token: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            source_token: source_token.into(),
            currency: currency.into(),
        }
    }
}

/// Application-level result of a charge attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// The gateway captured the payment.
    Accepted { payment_id: String },
    /// The gateway processed and declined the charge.
    Declined { reason: String },
}

/// Charge and refund operations against the payment gateway.
#[derive(Clone)]
pub struct PaymentService<G> {
    gateway: G,
    config: PaymentConfig,
}

impl<G: PaymentGateway> PaymentService<G> {
    /// Creates a payment service over the given gateway binding.
    pub fn new(gateway: G, config: PaymentConfig) -> Self {
        Self { gateway, config }
    }

    /// Charges the order total once under the given idempotency key.
    ///
    /// A coordinator-level retry of the whole charge step must reuse
    /// the same key so the gateway recognizes the duplicate instead of
    /// capturing twice. Declines come back as
    /// [`ChargeOutcome::Declined`]; transport faults as
    /// [`SagaError::Gateway`].
    pub async fn charge(&self, order: &Order, idempotency_key: Uuid) -> Result<ChargeOutcome> {
        let mut request = ChargeRequest::for_order(order, idempotency_key, &self.config.source_token);
        request.amount_money.currency = self.config.currency.clone();

        let payload = serde_json::to_vec(&request)?;
        let metadata = self.request_metadata("/v1/payments");

        tracing::info!(
            order_id = %order.id,
            %idempotency_key,
            amount = request.amount_money.amount,
            "invoking payment gateway"
        );

        match self.gateway.invoke(OP_CHARGE, &payload, &metadata).await {
            Ok(response) => {
                let payment_id = response
                    .body
                    .pointer("/payment/id")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| {
                        SagaError::Gateway("malformed gateway response: missing payment id".into())
                    })?
                    .to_string();
                Ok(ChargeOutcome::Accepted { payment_id })
            }
            Err(GatewayError::Declined(reason)) => {
                tracing::info!(order_id = %order.id, %reason, "charge declined");
                Ok(ChargeOutcome::Declined { reason })
            }
            Err(GatewayError::Transport(message)) => Err(SagaError::Gateway(message)),
        }
    }

    /// Issues a best-effort reversal for a captured payment.
    ///
    /// Not guaranteed synchronous at the processor; an acknowledged
    /// refund may still settle later.
    pub async fn refund(&self, payment_id: &str) -> Result<()> {
        let payload = serde_json::to_vec(&serde_json::json!({ "payment_id": payment_id }))?;
        let metadata = self.request_metadata(&format!("/v1/payments/{payment_id}/refunds"));

        tracing::info!(payment_id, "processing refund");

        self.gateway
            .invoke(OP_REFUND, &payload, &metadata)
            .await
            .map_err(|e| SagaError::Gateway(e.to_string()))?;
        Ok(())
    }

    fn request_metadata(&self, path: &str) -> HashMap<String, String> {
        HashMap::from([
            ("content-type".to_string(), "application/json".to_string()),
            ("api-version".to_string(), "2024-01-18".to_string()),
            ("path".to_string(), path.to_string()),
        ])
    }
}
