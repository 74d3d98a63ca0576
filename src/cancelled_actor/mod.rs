//! # Cancelled Orders
//!
//! Append-only shadow records written when an admin cancels an order. A record is
//! created once and is never updated or deleted.

use crate::model::{CancelledOrder, CancelledOrderCreate};
use async_trait::async_trait;
use chrono::Utc;
use collection_actor::{ActorEntity, FrameworkError, ResourceActor, ResourceClient};
use std::convert::Infallible;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CancelledError {
    #[error("Cancellation not found: {0}")]
    NotFound(String),

    /// The order already has a cancellation record.
    #[error("Order {0} is already cancelled")]
    AlreadyCancelled(String),

    #[error("A cancellation needs a reason")]
    MissingReason,

    #[error("Cancellation records are immutable: {0}")]
    Immutable(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CancelledError {
    fn from(e: FrameworkError) -> Self {
        match e.into_entity_error::<CancelledError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => CancelledError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => CancelledError::AlreadyCancelled(id),
            Err(other) => CancelledError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[async_trait]
impl ActorEntity for CancelledOrder {
    type Id = String;
    type Create = CancelledOrderCreate;
    type Update = ();
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = CancelledError;

    fn id(&self) -> &String {
        &self.order.order_id
    }

    fn allocate_id(_seq: u64, params: &CancelledOrderCreate) -> String {
        params.order.order_id.clone()
    }

    fn from_create_params(_id: String, params: CancelledOrderCreate) -> Result<Self, Self::Error> {
        let reason = params.reason.trim();
        if reason.is_empty() {
            return Err(CancelledError::MissingReason);
        }
        Ok(Self {
            order: params.order,
            reason: reason.to_string(),
            cancelled_at: Utc::now(),
        })
    }

    async fn on_update(&mut self, _update: (), _ctx: &Self::Context) -> Result<(), Self::Error> {
        Err(CancelledError::Immutable(self.order.order_id.clone()))
    }

    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Err(CancelledError::Immutable(self.order.order_id.clone()))
    }

    async fn handle_action(
        &mut self,
        action: Infallible,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        match action {}
    }
}

/// Creates the cancelled-orders actor, preloaded with `seed`, and its client.
pub fn new(
    buffer: usize,
    seed: Vec<CancelledOrder>,
) -> (ResourceActor<CancelledOrder>, ResourceClient<CancelledOrder>) {
    ResourceActor::with_records(buffer, seed)
}
