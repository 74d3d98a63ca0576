use crate::model::{Order, OrderStatus, VariantKey};
use std::collections::BTreeMap;
use tokio::sync::broadcast;
use tracing::debug;

/// Something that changed in the store, published after it was written.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    OrderCommitted(Box<Order>),
    OrderStatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    /// Full stock snapshot of one product.
    StockChanged {
        product_id: String,
        levels: BTreeMap<VariantKey, u32>,
        total: u64,
    },
}

/// Fan-out of [`StoreEvent`]s to any number of subscribers.
///
/// Publishing never blocks and never fails; with no subscriber the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: StoreEvent) {
        let delivered = self.sender.send(event).unwrap_or(0);
        debug!(delivered, "Event published");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}
