//! Saga error types.

use domain::OrderError;
use statestore::StateStoreError;
use thiserror::Error;

/// Errors that can occur during saga operations.
///
/// Business failures (item not found, out of stock, payment declined)
/// are not errors: they terminate the saga early with a failed
/// [`domain::OrderOutcome`]. This enum covers client errors and
/// transient infrastructure faults only, so callers can retry the
/// whole submission on the latter.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The order failed validation. Rejected with no side effects.
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    /// The state store could not be reached. Retryable.
    #[error("state store error: {0}")]
    StateStore(#[from] StateStoreError),

    /// The payment gateway could not be reached. Retryable: the
    /// charge idempotency key prevents double capture.
    #[error("payment gateway error: {0}")]
    Gateway(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
