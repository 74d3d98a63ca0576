//! # Product Actor
//!
//! The Variant Stock Ledger. One actor owns every product document, so a stock check
//! and the decrement it guards always happen in the same turn.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](collection_actor::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`]
//! - [`actions`] - [`ProductAction`] and [`ProductActionResult`]
//! - [`new()`] - Factory function that creates the actor and its client
//!
//! ## Custom Actions
//!
//! ```rust,ignore
//! let left = products.get_available("MP010", &black_m).await?;
//! products.reserve_and_decrement("MP010", black_m.clone(), 2).await?;
//!
//! // Several lines, all-or-nothing, keyed for retries:
//! products.reserve_lines("PAY-123", &lines).await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Product;
use collection_actor::{ResourceActor, ResourceClient};

/// Creates a new Product actor, preloaded with `seed`, and its client.
pub fn new(buffer: usize, seed: Vec<Product>) -> (ResourceActor<Product>, ResourceClient<Product>) {
    ResourceActor::with_records(buffer, seed)
}
