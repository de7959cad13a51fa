use thiserror::Error;

/// Validation errors for inbound orders.
///
/// These are client errors: the order is rejected before any side
/// effects, and no saga run is started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The order carries no line items.
    #[error("order has no line items")]
    NoItems,

    /// A line item requests a zero or negative quantity.
    #[error("invalid quantity {quantity} for item '{item}'")]
    InvalidQuantity { item: String, quantity: i64 },

    /// The order total is negative.
    #[error("order total {amount} is negative")]
    NegativeTotal { amount: i64 },
}
