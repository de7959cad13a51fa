//! Service adapters driven by the saga coordinator.

pub mod inventory;
pub mod notification;
pub mod payment;

pub use inventory::{DEFAULT_CATALOG, InventoryItem, InventoryService, ReservationResult};
pub use notification::{EventPublisher, FulfillmentEvent, InMemoryPublisher, PublishError};
pub use payment::{ChargeOutcome, PaymentConfig, PaymentService};
