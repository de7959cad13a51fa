//! Domain model for the order fulfillment pipeline.
//!
//! An [`Order`] is immutable once accepted by the saga coordinator for
//! a given run; the coordinator's terminal artifact is the
//! [`OrderOutcome`] describing how far the saga got and why it stopped.

mod error;
mod order;
mod outcome;

pub use error::OrderError;
pub use order::{LineItem, Order};
pub use outcome::{FulfillmentStage, OrderOutcome, REASON_DECLINED, REASON_GATEWAY_ERROR};
