//! Customer profiles: the per-customer order list and address book.

pub mod entity;
pub mod error;

pub use entity::{CustomerAction, CustomerActionResult};
pub use error::*;

use crate::model::Customer;
use collection_actor::{ResourceActor, ResourceClient};

/// Creates a new Customer actor, preloaded with `seed`, and its client.
pub fn new(
    buffer: usize,
    seed: Vec<Customer>,
) -> (ResourceActor<Customer>, ResourceClient<Customer>) {
    ResourceActor::with_records(buffer, seed)
}
