use crate::model::{CancelledOrder, OrderStatus};

/// Admin operations on a committed order.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// Any allowed transition except cancellation, which needs a reason.
    SetStatus(OrderStatus),
    Cancel { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    StatusChanged {
        from: OrderStatus,
        to: OrderStatus,
    },
    Cancelled {
        from: OrderStatus,
        /// Whether the order's stock went back to the ledger.
        restocked: bool,
        record: Box<CancelledOrder>,
    },
}
