//! ActorEntity trait implementation for the Order domain type.
//!
//! Creating an order is the commit: `on_create` reserves every line in the ledger and
//! links the order to its customer before the actor stores it. If either step fails
//! the order is never stored and any reservation it made is released.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use super::reservation::{release, reserve_with_retry, ReservePolicy};
use super::sequencer::{format_order_id, parse_suffix};
use crate::clients::{CancelledClient, CustomerClient, ProductClient};
use crate::events::{EventBus, StoreEvent};
use crate::model::{Order, OrderCreate, OrderStatus};
use crate::product_actor::ReserveLine;
use async_trait::async_trait;
use chrono::Utc;
use collection_actor::{ActorEntity, RevertOutcome};
use tracing::{error, info, warn};

/// Dependencies of the order collection, injected at `run()`.
#[derive(Clone)]
pub struct OrderContext {
    pub products: ProductClient,
    pub customers: CustomerClient,
    pub cancelled: CancelledClient,
    /// Receives `OrderCommitted` and `OrderStatusChanged` in store order.
    pub events: EventBus,
    pub policy: ReservePolicy,
    /// Whether cancelling an order gives its stock back.
    pub restock_on_cancel: bool,
}

impl Order {
    /// The ledger lines this order draws from.
    pub fn reserve_lines(&self) -> Result<Vec<ReserveLine>, OrderError> {
        self.lines
            .iter()
            .map(|line| {
                let variant = line.variant().ok_or_else(|| {
                    OrderError::ValidationError(format!(
                        "line {} has no valid variant ({}/{})",
                        line.product_id, line.color, line.size
                    ))
                })?;
                Ok(ReserveLine {
                    product_id: line.product_id.clone(),
                    variant,
                    quantity: line.quantity,
                })
            })
            .collect()
    }

    /// Gives the order's stock back, preferring the journalled reservation.
    async fn restock(&self, products: &ProductClient) -> bool {
        let key = self.payment_reference();
        match products.release(key).await {
            Ok(RevertOutcome::Reverted(count)) => {
                info!(order_id = %self.order_id, count, "Reservation reverted");
                true
            }
            Ok(RevertOutcome::AlreadyReverted) => {
                warn!(order_id = %self.order_id, "Reservation was already reverted");
                false
            }
            Ok(RevertOutcome::Tombstoned) => {
                // Not journalled in this process: put the lines back directly.
                let restocked = match self.reserve_lines() {
                    Ok(lines) => products.restock_lines(&lines).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                match restocked {
                    Ok(()) => true,
                    Err(e) => {
                        error!(order_id = %self.order_id, error = %e, "Restock failed");
                        false
                    }
                }
            }
            Err(e) => {
                error!(order_id = %self.order_id, error = %e, "Restock failed");
                false
            }
        }
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = String;
    type Create = OrderCreate;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn id(&self) -> &String {
        &self.order_id
    }

    fn allocate_id(seq: u64, params: &OrderCreate) -> String {
        format_order_id(&params.prefix, seq, params.id_width)
    }

    fn sequence_of(id: &String) -> Option<u64> {
        parse_suffix(id)
    }

    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, Self::Error> {
        let draft = params.draft;
        if draft.lines.is_empty() {
            return Err(OrderError::ValidationError("an order needs at least one line".into()));
        }
        if let Some(line) = draft.lines.iter().find(|l| l.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "line {} has quantity 0",
                line.product_id
            )));
        }
        if draft.checkout.payment_id.trim().is_empty() {
            return Err(OrderError::ValidationError("missing payment reference".into()));
        }
        if draft.customer_id.trim().is_empty() {
            return Err(OrderError::ValidationError("missing customer".into()));
        }

        Ok(Self {
            order_id: id,
            customer_id: draft.customer_id,
            status: draft.channel.initial_status(),
            channel: draft.channel,
            checkout: draft.checkout,
            lines: draft.lines,
            shipping_address: draft.shipping_address,
            subtotal: draft.subtotal,
            tax: draft.tax,
            shipping_fee: draft.shipping_fee,
            total: draft.total,
            created_at: Utc::now(),
        })
    }

    /// Reserves stock, then links the order to its customer.
    async fn on_create(&mut self, ctx: &Self::Context) -> Result<(), Self::Error> {
        let lines = self.reserve_lines()?;
        let key = self.payment_reference().to_string();

        let reserved = reserve_with_retry(&ctx.products, &key, &lines, &ctx.policy).await?;
        info!(order_id = %self.order_id, lines = reserved.len(), "Stock reserved");

        if let Err(e) = ctx
            .customers
            .record_order(&self.customer_id, &self.order_id, self.billing_address())
            .await
        {
            error!(order_id = %self.order_id, error = %e, "Linking order to customer failed");
            release(&ctx.products, &key).await;
            return Err(OrderError::PersistenceFailed(e.to_string()));
        }
        Ok(())
    }

    async fn on_committed(&self, previous: Option<&Self>, ctx: &Self::Context) {
        match previous {
            None => ctx
                .events
                .publish(StoreEvent::OrderCommitted(Box::new(self.clone()))),
            Some(previous) if previous.status != self.status => {
                ctx.events.publish(StoreEvent::OrderStatusChanged {
                    order_id: self.order_id.clone(),
                    from: previous.status,
                    to: self.status,
                })
            }
            Some(_) => {}
        }
    }

    async fn on_update(&mut self, _update: (), _ctx: &Self::Context) -> Result<(), Self::Error> {
        Err(OrderError::Immutable(self.order_id.clone()))
    }

    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Err(OrderError::Immutable(self.order_id.clone()))
    }

    /// Handles admin status changes.
    ///
    /// # Actions
    /// - `SetStatus`: any transition the state machine allows, except to `Cancelled`
    /// - `Cancel`: writes the cancellation record, then optionally restocks
    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &Self::Context,
    ) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::SetStatus(OrderStatus::Cancelled) => Err(OrderError::MissingReason),
            OrderAction::SetStatus(to) => {
                let from = self.status;
                if !from.can_transition_to(to) {
                    return Err(OrderError::InvalidTransition {
                        order_id: self.order_id.clone(),
                        from,
                        to,
                    });
                }
                self.status = to;
                Ok(OrderActionResult::StatusChanged { from, to })
            }
            OrderAction::Cancel { reason } => {
                let from = self.status;
                if !from.can_transition_to(OrderStatus::Cancelled) {
                    return Err(OrderError::InvalidTransition {
                        order_id: self.order_id.clone(),
                        from,
                        to: OrderStatus::Cancelled,
                    });
                }
                if reason.trim().is_empty() {
                    return Err(OrderError::MissingReason);
                }

                self.status = OrderStatus::Cancelled;
                let record = ctx
                    .cancelled
                    .record(self.clone(), &reason)
                    .await
                    .map_err(|e| OrderError::CancellationFailed(e.to_string()))?;

                let restocked = ctx.restock_on_cancel && self.restock(&ctx.products).await;
                Ok(OrderActionResult::Cancelled {
                    from,
                    restocked,
                    record: Box::new(record),
                })
            }
        }
    }
}
