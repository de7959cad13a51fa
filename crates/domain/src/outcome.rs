use common::OrderId;
use serde::{Deserialize, Serialize};

/// Failure reason reported when the payment gateway declines a charge.
pub const REASON_DECLINED: &str = "declined";

/// Failure reason reported when the gateway could not be reached.
///
/// Outcomes carrying this reason are safe to retry end to end: the
/// charge idempotency key guarantees the gateway will not capture the
/// payment twice.
pub const REASON_GATEWAY_ERROR: &str = "gateway_error";

/// The furthest stage a saga run reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStage {
    /// Stopped while reserving inventory.
    Reservation,
    /// Stopped while capturing payment.
    Payment,
    /// Charge captured and fulfillment event published.
    Notified,
}

impl std::fmt::Display for FulfillmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FulfillmentStage::Reservation => "reservation",
            FulfillmentStage::Payment => "payment",
            FulfillmentStage::Notified => "notified",
        };
        write!(f, "{s}")
    }
}

/// Terminal artifact of one saga run, returned to the caller.
///
/// A successful outcome implies every line item reserved, the charge
/// was accepted, and a notification publish was attempted. An outcome
/// never reports the payment stage without all reservations having
/// succeeded first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOutcome {
    pub order_id: OrderId,
    pub success: bool,
    pub stage: FulfillmentStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OrderOutcome {
    /// Builds the successful terminal outcome.
    pub fn fulfilled(order_id: OrderId) -> Self {
        Self {
            order_id,
            success: true,
            stage: FulfillmentStage::Notified,
            reason: None,
        }
    }

    /// Builds a failed outcome for the given stage.
    pub fn failed(order_id: OrderId, stage: FulfillmentStage, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            success: false,
            stage,
            reason: Some(reason.into()),
        }
    }

    /// True if the whole submission can be retried safely.
    ///
    /// Only transport-level gateway failures qualify; business
    /// failures (out of stock, declined) are terminal.
    pub fn is_retryable(&self) -> bool {
        self.reason.as_deref() == Some(REASON_GATEWAY_ERROR)
    }
}
