//! Order fulfillment saga.
//!
//! The coordinator drives each inbound order through three steps:
//! 1. Reserve inventory for every line item
//! 2. Capture payment once, under a run-stable idempotency key
//! 3. Publish a fulfillment event
//!
//! Any step failure short-circuits the run and skips later steps.
//! Compensation is forward-only: already-reserved inventory is not
//! released, and a notification miss never unwinds a captured payment.

pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod services;

pub use coordinator::SagaCoordinator;
pub use error::SagaError;
pub use gateway::{
    ChargeRequest, GatewayError, GatewayResponse, PaymentGateway, SimulatedGateway,
    TEST_SOURCE_ACCEPT, TEST_SOURCE_DECLINE,
};
pub use services::{
    ChargeOutcome, DEFAULT_CATALOG, EventPublisher, FulfillmentEvent, InMemoryPublisher,
    InventoryItem, InventoryService, PaymentConfig, PaymentService, PublishError,
    ReservationResult,
};
pub use services::notification::NOTIFICATIONS_TOPIC;
