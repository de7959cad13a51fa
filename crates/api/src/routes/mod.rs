//! HTTP route handlers.

pub mod health;
pub mod inventory;
pub mod metrics;
pub mod orders;
pub mod payments;

use saga::{
    InMemoryPublisher, InventoryService, PaymentService, SagaCoordinator, SimulatedGateway,
};
use statestore::StateStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: StateStore> {
    pub coordinator: SagaCoordinator<S, SimulatedGateway, InMemoryPublisher>,
    pub inventory: InventoryService<S>,
    pub payments: PaymentService<SimulatedGateway>,
}
