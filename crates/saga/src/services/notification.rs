//! Fulfillment event publisher.
//!
//! Publishing waits for broker-accept only; delivery downstream is
//! at-least-once and duplicate handling is the subscriber's problem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId};
use domain::Order;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Topic the coordinator publishes fulfillment events to.
pub const NOTIFICATIONS_TOPIC: &str = "notifications";

/// Errors surfaced by the publisher.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The broker did not accept the publish.
    #[error("broker rejected publish to '{topic}': {message}")]
    Broker { topic: String, message: String },
}

/// Event published when an order is fulfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentEvent {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub outcome: String,
    pub published_at: DateTime<Utc>,
}

impl FulfillmentEvent {
    /// Builds the fulfilled event for an order.
    pub fn fulfilled(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            customer_id: order.customer.clone(),
            outcome: "fulfilled".to_string(),
            published_at: Utc::now(),
        }
    }
}

/// Publisher seam over the pub/sub broker.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes a payload to a topic, returning once the broker
    /// accepts it. No subscriber acknowledgment is awaited.
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), PublishError>;
}

#[derive(Debug, Default)]
struct InMemoryPublisherState {
    published: Vec<(String, serde_json::Value)>,
    fail_on_publish: bool,
}

/// In-memory publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPublisher {
    state: Arc<RwLock<InMemoryPublisherState>>,
}

impl InMemoryPublisher {
    /// Creates a new in-memory publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to reject the next publish calls.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }

    /// Returns every published (topic, payload) pair, in order.
    pub fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.state.read().unwrap().published.clone()
    }

    /// Returns the number of accepted publishes.
    pub fn published_count(&self) -> usize {
        self.state.read().unwrap().published.len()
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish(
        &self,
        topic: &str,
        payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_publish {
            return Err(PublishError::Broker {
                topic: topic.to_string(),
                message: "broker unavailable".to_string(),
            });
        }

        state.published.push((topic.to_string(), payload));
        Ok(())
    }
}
