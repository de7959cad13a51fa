//! Outbound payment gateway binding.
//!
//! The gateway is reached through an output binding: one `invoke` call
//! carrying a JSON payload and request metadata (content type, API
//! version marker, downstream resource path). Application-level
//! declines (400-class) are surfaced distinctly from transport faults
//! so the coordinator can classify them as business vs transient
//! failures.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::CustomerId;
use domain::Order;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Binding operation for creating a charge.
pub const OP_CHARGE: &str = "create";
/// Binding operation for reversing a charge.
pub const OP_REFUND: &str = "refund";

/// Test source token the simulated gateway always accepts.
pub const TEST_SOURCE_ACCEPT: &str = "cnon:card-nonce-ok";
/// Test source token the simulated gateway always declines.
pub const TEST_SOURCE_DECLINE: &str = "cnon:card-nonce-declined";

/// Errors surfaced by the gateway binding.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway processed the request and declined it (400-class).
    #[error("charge declined: {0}")]
    Declined(String),

    /// The gateway could not be reached or returned an unknown error.
    #[error("gateway transport error: {0}")]
    Transport(String),
}

/// Successful response from a gateway invocation.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// The charge request sent over the binding.
///
/// A repeated request with the same `idempotency_key` and payload is
/// treated by the gateway as the same logical charge, never a second
/// capture. `reference_id` is derived deterministically from the
/// customer and the key so retries are recognizable downstream too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub amount_money: AmountMoney,
    pub idempotency_key: String,
    pub source_id: String,
    pub autocomplete: bool,
    pub customer_id: String,
    pub reference_id: String,
}

/// Amount and currency of a charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountMoney {
    pub amount: i64,
    pub currency: String,
}

impl ChargeRequest {
    /// Builds a charge request for one logical payment attempt.
    pub fn for_order(order: &Order, idempotency_key: Uuid, source_id: &str) -> Self {
        Self {
            amount_money: AmountMoney {
                amount: order.total.amount,
                currency: order.total.currency.clone(),
            },
            idempotency_key: idempotency_key.to_string(),
            source_id: source_id.to_string(),
            autocomplete: true,
            customer_id: order.customer.to_string(),
            reference_id: reference_id(&order.customer, idempotency_key),
        }
    }
}

/// Derives the stable gateway reference for a logical charge attempt.
fn reference_id(customer: &CustomerId, idempotency_key: Uuid) -> String {
    format!("{customer}-{idempotency_key}")
}

/// Outbound binding to the third-party payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Invokes the binding with a JSON payload and request metadata.
    async fn invoke(
        &self,
        operation: &str,
        payload: &[u8],
        metadata: &HashMap<String, String>,
    ) -> Result<GatewayResponse, GatewayError>;
}

#[derive(Debug, Clone)]
enum StoredOutcome {
    Accepted { payment_id: String },
    Declined { reason: String },
}

#[derive(Debug, Default)]
struct SimulatedGatewayState {
    /// Every charge request the gateway ever received, in order.
    charges: Vec<ChargeRequest>,
    /// Refunded payment IDs, in order.
    refunds: Vec<String>,
    /// Outcome per idempotency key, for duplicate detection.
    completed: HashMap<String, StoredOutcome>,
    next_id: u32,
    fail_transport: bool,
}

/// Simulated payment gateway for tests and local runs.
///
/// Models a real processor's success/decline split with the fixed test
/// source token pair, dedupes repeated charges by idempotency key, and
/// records every invocation so tests can assert call counts and keys.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    state: Arc<RwLock<SimulatedGatewayState>>,
}

impl SimulatedGateway {
    /// Creates a new simulated gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a gateway outage: every invocation fails with a
    /// transport error until cleared.
    pub fn set_fail_transport(&self, fail: bool) {
        self.state.write().unwrap().fail_transport = fail;
    }

    /// Returns every charge request received so far.
    pub fn charge_invocations(&self) -> Vec<ChargeRequest> {
        self.state.read().unwrap().charges.clone()
    }

    /// Returns the number of charge invocations received.
    pub fn charge_count(&self) -> usize {
        self.state.read().unwrap().charges.len()
    }

    /// Returns the number of distinct captured payments.
    pub fn captured_count(&self) -> usize {
        self.state
            .read()
            .unwrap()
            .completed
            .values()
            .filter(|o| matches!(o, StoredOutcome::Accepted { .. }))
            .count()
    }

    /// Returns the refunded payment IDs, in order.
    pub fn refunds(&self) -> Vec<String> {
        self.state.read().unwrap().refunds.clone()
    }

    fn charge(&self, payload: &[u8]) -> Result<GatewayResponse, GatewayError> {
        let request: ChargeRequest = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::Declined(format!("malformed charge request: {e}")))?;

        let mut state = self.state.write().unwrap();
        state.charges.push(request.clone());

        // Same key, same logical charge: replay the stored outcome.
        if let Some(outcome) = state.completed.get(&request.idempotency_key).cloned() {
            return match outcome {
                StoredOutcome::Accepted { payment_id } => Ok(accepted_response(&payment_id, &request)),
                StoredOutcome::Declined { reason } => Err(GatewayError::Declined(reason)),
            };
        }

        if request.source_id == TEST_SOURCE_DECLINE {
            let reason = "card declined".to_string();
            state.completed.insert(
                request.idempotency_key.clone(),
                StoredOutcome::Declined {
                    reason: reason.clone(),
                },
            );
            return Err(GatewayError::Declined(reason));
        }

        if request.source_id != TEST_SOURCE_ACCEPT {
            return Err(GatewayError::Declined(format!(
                "unrecognized source token '{}'",
                request.source_id
            )));
        }

        state.next_id += 1;
        let payment_id = format!("PAY-{:04}", state.next_id);
        state.completed.insert(
            request.idempotency_key.clone(),
            StoredOutcome::Accepted {
                payment_id: payment_id.clone(),
            },
        );

        Ok(accepted_response(&payment_id, &request))
    }

    fn refund(&self, payload: &[u8]) -> Result<GatewayResponse, GatewayError> {
        let body: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::Declined(format!("malformed refund request: {e}")))?;
        let payment_id = body
            .get("payment_id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| GatewayError::Declined("refund missing payment_id".to_string()))?
            .to_string();

        self.state.write().unwrap().refunds.push(payment_id);

        Ok(GatewayResponse {
            status: 200,
            body: serde_json::json!({ "status": "success" }),
        })
    }
}

fn accepted_response(payment_id: &str, request: &ChargeRequest) -> GatewayResponse {
    GatewayResponse {
        status: 201,
        body: serde_json::json!({
            "payment": {
                "id": payment_id,
                "reference_id": request.reference_id,
                "status": "COMPLETED",
            }
        }),
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn invoke(
        &self,
        operation: &str,
        payload: &[u8],
        _metadata: &HashMap<String, String>,
    ) -> Result<GatewayResponse, GatewayError> {
        if self.state.read().unwrap().fail_transport {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }

        match operation {
            OP_CHARGE => self.charge(payload),
            OP_REFUND => {
                // Stand-in delay for a real reversal round trip.
                tokio::time::sleep(Duration::from_millis(10)).await;
                self.refund(payload)
            }
            other => Err(GatewayError::Transport(format!(
                "unsupported binding operation '{other}'"
            ))),
        }
    }
}
