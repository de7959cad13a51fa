//! Inventory service over the shared state store.
//!
//! Owns one quantity counter per catalog item, stored as an ASCII
//! decimal string under the lowercased item name. Reservation is a
//! read-only capacity check: it never decrements the stored quantity,
//! so concurrent orders can over-commit stock. That limitation is kept
//! deliberately; see DESIGN.md.

use common::OrderId;
use serde::{Deserialize, Serialize};
use statestore::StateStore;

use crate::error::Result;

/// Default item catalog when none is configured.
pub const DEFAULT_CATALOG: [&str; 4] = ["orange", "apple", "pear", "kiwi"];

/// Quantity written for every item on restock.
const RESTOCK_QUANTITY: i64 = 100;

/// One catalog item and its stored quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: i64,
}

/// Per-item outcome of a reservation attempt.
///
/// Ephemeral: produced and consumed within one saga run, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationResult {
    #[serde(rename = "id")]
    pub order_id: OrderId,
    pub success: bool,
    pub message: String,
}

impl ReservationResult {
    fn reserved(order_id: &OrderId) -> Self {
        Self {
            order_id: order_id.clone(),
            success: true,
            message: "Item reserved successfully".to_string(),
        }
    }

    fn rejected(order_id: &OrderId, message: impl Into<String>) -> Self {
        Self {
            order_id: order_id.clone(),
            success: false,
            message: message.into(),
        }
    }
}

/// Inventory operations over a keyed state store.
#[derive(Clone)]
pub struct InventoryService<S> {
    store: S,
    catalog: Vec<String>,
}

impl<S: StateStore> InventoryService<S> {
    /// Creates an inventory service over the given store and catalog.
    ///
    /// The catalog comes from configuration; item keys are lowercased
    /// before hitting the store.
    pub fn new(store: S, catalog: Vec<String>) -> Self {
        Self { store, catalog }
    }

    /// Creates a service with the default catalog.
    pub fn with_default_catalog(store: S) -> Self {
        let catalog = DEFAULT_CATALOG.iter().map(|s| s.to_string()).collect();
        Self::new(store, catalog)
    }

    /// Returns the configured catalog.
    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Lists every catalog item present in the store.
    ///
    /// Items absent from the store are omitted, not reported as zero.
    pub async fn list(&self) -> Result<Vec<InventoryItem>> {
        let mut items = Vec::new();

        for name in &self.catalog {
            let Some(raw) = self.store.get(&name.to_lowercase()).await? else {
                continue;
            };
            match parse_quantity(&raw) {
                Some(quantity) => items.push(InventoryItem {
                    name: name.clone(),
                    quantity,
                }),
                None => {
                    tracing::warn!(item = %name, "skipping item with malformed quantity data");
                }
            }
        }

        Ok(items)
    }

    /// Restocks every catalog item to the default quantity.
    ///
    /// One bulk write, unconditional overwrite of existing values.
    pub async fn restock(&self) -> Result<()> {
        let pairs = self
            .catalog
            .iter()
            .map(|name| {
                (
                    name.to_lowercase(),
                    RESTOCK_QUANTITY.to_string().into_bytes(),
                )
            })
            .collect();
        self.store.bulk_set(pairs).await?;
        tracing::info!("inventory restocked");
        Ok(())
    }

    /// Deletes every catalog item's entry from the store.
    pub async fn clear(&self) -> Result<()> {
        for name in &self.catalog {
            self.store.delete(&name.to_lowercase()).await?;
        }
        tracing::info!("inventory cleared");
        Ok(())
    }

    /// Checks whether `item` can be reserved for an order.
    ///
    /// Business failures (not found, malformed data, out of stock)
    /// come back as an unsuccessful [`ReservationResult`]; only store
    /// transport faults are errors, so the caller can tell "ask again
    /// later" from "this order cannot be fulfilled".
    pub async fn reserve(&self, item: &str, order_id: &OrderId) -> Result<ReservationResult> {
        tracing::info!(%order_id, item, "processing inventory reservation");

        let Some(raw) = self.store.get(&item.to_lowercase()).await? else {
            return Ok(ReservationResult::rejected(
                order_id,
                format!("Item {item} not found in inventory"),
            ));
        };

        let Some(quantity) = parse_quantity(&raw) else {
            return Ok(ReservationResult::rejected(
                order_id,
                format!("Error processing item {item}: malformed quantity data"),
            ));
        };

        if quantity <= 0 {
            return Ok(ReservationResult::rejected(
                order_id,
                format!("Item {item} is out of stock"),
            ));
        }

        // Capacity check only: the stored quantity is not decremented.
        Ok(ReservationResult::reserved(order_id))
    }
}

fn parse_quantity(raw: &[u8]) -> Option<i64> {
    std::str::from_utf8(raw).ok()?.trim().parse().ok()
}
