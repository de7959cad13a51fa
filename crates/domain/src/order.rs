use common::{CustomerId, Money, OrderId};
use serde::{Deserialize, Serialize};

use crate::OrderError;

/// A single line of an order: one item and its requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item identifier, matched against the inventory catalog.
    pub item: String,
    /// Requested quantity. Must be at least 1.
    pub quantity: i64,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(item: impl Into<String>, quantity: i64) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

/// An inbound customer order.
///
/// Immutable once accepted by the coordinator for a saga run. The ID
/// is caller-supplied and must be unique per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerId,
    pub items: Vec<LineItem>,
    pub total: Money,
}

impl Order {
    /// Creates a new order.
    pub fn new(id: OrderId, customer: CustomerId, items: Vec<LineItem>, total: Money) -> Self {
        Self {
            id,
            customer,
            items,
            total,
        }
    }

    /// Validates the order before a saga run starts.
    ///
    /// Requires at least one line item, a strictly positive quantity on
    /// every line, and a non-negative total. A malformed order is
    /// rejected here with no side effects.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }

        for line in &self.items {
            if line.quantity <= 0 {
                return Err(OrderError::InvalidQuantity {
                    item: line.item.clone(),
                    quantity: line.quantity,
                });
            }
        }

        if self.total.is_negative() {
            return Err(OrderError::NegativeTotal {
                amount: self.total.amount,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_items(items: Vec<LineItem>) -> Order {
        Order::new(
            OrderId::new("o1"),
            CustomerId::new("c1"),
            items,
            Money::usd(500),
        )
    }

    #[test]
    fn valid_order_passes() {
        let order = order_with_items(vec![LineItem::new("apple", 1)]);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn empty_order_is_rejected() {
        let order = order_with_items(vec![]);
        assert_eq!(order.validate(), Err(OrderError::NoItems));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let order = order_with_items(vec![LineItem::new("apple", 0)]);
        assert_eq!(
            order.validate(),
            Err(OrderError::InvalidQuantity {
                item: "apple".to_string(),
                quantity: 0,
            })
        );
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let order = order_with_items(vec![LineItem::new("apple", -2)]);
        assert!(matches!(
            order.validate(),
            Err(OrderError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn negative_total_is_rejected() {
        let mut order = order_with_items(vec![LineItem::new("apple", 1)]);
        order.total = Money::usd(-500);
        assert_eq!(
            order.validate(),
            Err(OrderError::NegativeTotal { amount: -500 })
        );
    }

    #[test]
    fn first_invalid_line_wins() {
        let order = order_with_items(vec![
            LineItem::new("apple", 1),
            LineItem::new("pear", 0),
            LineItem::new("kiwi", -1),
        ]);
        assert_eq!(
            order.validate(),
            Err(OrderError::InvalidQuantity {
                item: "pear".to_string(),
                quantity: 0,
            })
        );
    }

    #[test]
    fn order_deserializes_from_wire_format() {
        let json = r#"{
            "id": "o1",
            "customer": "c1",
            "items": [{"item": "apple", "quantity": 1}],
            "total": {"amount": 500, "currency": "USD"}
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id.as_str(), "o1");
        assert_eq!(order.items.len(), 1);
        assert!(order.validate().is_ok());
    }
}
