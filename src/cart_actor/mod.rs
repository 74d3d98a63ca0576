//! # Cart Actor
//!
//! Persisted carts, one per customer. A cart only holds intent; nothing here touches
//! the stock ledger.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Cart;
use collection_actor::{ResourceActor, ResourceClient};

/// Creates a new, empty Cart actor and its client.
pub fn new(buffer: usize) -> (ResourceActor<Cart>, ResourceClient<Cart>) {
    ResourceActor::new(buffer)
}
