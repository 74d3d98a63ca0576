//! # Order Client
//!
//! Provides a high-level API for the `Order` actor. Reservation and customer linking
//! happen in the actor's `on_create` hook and the actor publishes the resulting events;
//! this client picks the id scheme and reads the committed order back.
use crate::model::{CancelledOrder, Channel, Order, OrderCreate, OrderDraft, OrderStatus};
use crate::order_actor::{IdScheme, OrderAction, OrderActionResult, OrderError};
use async_trait::async_trait;
use collection_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    ids: IdScheme,
}

/// The outcome of an admin cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct Cancellation {
    pub from: OrderStatus,
    pub restocked: bool,
    pub record: CancelledOrder,
}

/// Narrows the admin order list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<String>,
    pub channel: Option<Channel>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| order.status == s)
            && self
                .customer_id
                .as_deref()
                .map_or(true, |c| order.customer_id == c)
            && self.channel.map_or(true, |c| order.channel == c)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::from(e)
    }
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, ids: IdScheme) -> Self {
        Self { inner, ids }
    }

    /// Commits a draft and returns the stored order.
    #[instrument(skip(self, draft), fields(customer_id = %draft.customer_id, lines = draft.lines.len()))]
    pub async fn place_order(&self, draft: OrderDraft) -> Result<Order, OrderError> {
        debug!(?draft, "place_order called");
        let params = OrderCreate {
            prefix: self.ids.prefix_for(&draft).to_string(),
            id_width: self.ids.width,
            draft,
        };
        let id = self.inner.create(params).await?;
        info!(order_id = %id, "Order committed");
        self.get(id.clone()).await?.ok_or(OrderError::NotFound(id))
    }

    /// Moves an order along the state machine. Returns the previous status.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> Result<OrderStatus, OrderError> {
        match self
            .inner
            .perform_action(id.to_string(), OrderAction::SetStatus(status))
            .await?
        {
            OrderActionResult::StatusChanged { from, to } => {
                info!(order_id = id, %from, %to, "Status changed");
                Ok(from)
            }
            other => Err(unexpected(other)),
        }
    }

    /// Cancels an order and writes its cancellation record.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: &str, reason: &str) -> Result<Cancellation, OrderError> {
        let action = OrderAction::Cancel {
            reason: reason.to_string(),
        };
        match self.inner.perform_action(id.to_string(), action).await? {
            OrderActionResult::Cancelled {
                from,
                restocked,
                record,
            } => {
                info!(order_id = id, %from, restocked, "Order cancelled");
                Ok(Cancellation {
                    from,
                    restocked,
                    record: *record,
                })
            }
            other => Err(unexpected(other)),
        }
    }

    /// Orders matching `filter`, oldest first.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        let mut orders: Vec<Order> = self
            .list()
            .await?
            .into_iter()
            .filter(|order| filter.matches(order))
            .collect();
        orders.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        Ok(orders)
    }
}

