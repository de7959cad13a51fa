//! Shared value types used across the order fulfillment services.

mod types;

pub use types::{CustomerId, Money, OrderId};
