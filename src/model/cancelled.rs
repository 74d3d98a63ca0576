use crate::model::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The immutable record written when an order is cancelled. Keyed by the order id.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](collection_actor::ActorEntity) trait. The
/// collection is append-only: updates and deletes are refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledOrder {
    #[serde(flatten)]
    pub order: Order,
    pub reason: String,
    pub cancelled_at: DateTime<Utc>,
}

/// Payload for recording a cancellation.
#[derive(Debug, Clone)]
pub struct CancelledOrderCreate {
    pub order: Order,
    pub reason: String,
}
