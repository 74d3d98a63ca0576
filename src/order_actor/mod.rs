//! # Order Actor
//!
//! Committed orders. The actor allocates each order id in the same turn that stores
//! the order, so concurrent commits never share a number.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](collection_actor::ActorEntity) implementation for
//!   [`Order`], including the reservation in `on_create`
//! - [`sequencer`] - id parsing and formatting
//! - [`reservation`] - bounded retry around the ledger transaction
//! - [`actions`] - admin status changes
//! - [`error`] - [`OrderError`]

pub mod actions;
pub mod entity;
pub mod error;
pub mod reservation;
pub mod sequencer;

pub use actions::*;
pub use entity::OrderContext;
pub use error::*;
pub use reservation::ReservePolicy;
pub use sequencer::IdScheme;

use crate::model::Order;
use collection_actor::{ResourceActor, ResourceClient};

/// Creates the Order actor, preloaded with `seed`, and its client.
///
/// Numbering resumes after the highest order number in `seed`.
pub fn new(buffer: usize, seed: Vec<Order>) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::with_records(buffer, seed)
}
