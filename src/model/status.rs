//! The order status state machine.
//!
//! ```text
//! Placed -> Packed -> Shipped -> Delivered
//! Placed | Packed | Shipped | AddMore -> Cancelled
//! Placed -> AddMore -> Placed | Packed
//! ```
//!
//! `AddMore` parks a placed order while the customer adds items. `Delivered` and
//! `Cancelled` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    Placed,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
    AddMore,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether an admin may move an order from `self` to `next`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Placed, Packed)
                | (Packed, Shipped)
                | (Shipped, Delivered)
                | (Placed | Packed | Shipped | AddMore, Cancelled)
                | (Placed, AddMore)
                | (AddMore, Placed | Packed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
