//! # Collection Actor
//!
//! Building blocks for keeping document collections inside Tokio actors. Every
//! collection (products, customers, orders...) is owned by exactly one
//! [`ResourceActor`] task and reached through a cloneable [`ResourceClient`].
//!
//! ## Why one actor per collection?
//!
//! - Isolated state: no shared memory, no locks
//! - Sequential processing: a check and the write it guards happen in the same turn, so
//!   two buyers can never both take the last unit of a variant
//! - Collections that need each other talk through clients injected at `run()` time
//!
//! ## Layers
//!
//! 1. **Entity Layer** ([`ActorEntity`]): the document type and its business rules
//! 2. **Runtime Layer** ([`ResourceActor`]): message processing, staging, the journal
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]): typed requests
//!
//! ## Multi-document transactions
//!
//! A [`ResourceClient::transaction`] applies a list of `(id, action)` steps inside one
//! actor turn. Each step runs against a staged clone; if any step fails nothing is
//! written. With an idempotency key the results are journalled, a repeated key is
//! answered with [`TransactionOutcome::Replayed`], and [`ResourceClient::revert`] applies
//! each step's [`ActorEntity::compensation`] in reverse order.
//!
//! ```rust,ignore
//! let outcome = products
//!     .transaction(
//!         Some("PAY-1".into()),
//!         vec![
//!             (shirt_id, ProductAction::Reserve { variant: red_m, quantity: 2 }),
//!             (cap_id, ProductAction::Reserve { variant: default, quantity: 1 }),
//!         ],
//!     )
//!     .await?;
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies arrive through `run(context)`, not the constructor, so actors that call
//! each other can all be created first and wired afterwards:
//!
//! ```rust,ignore
//! let (product_actor, products) = ResourceActor::<Product>::new(32);
//! let (order_actor, orders) = ResourceActor::<Order>::new(32);
//!
//! tokio::spawn(product_actor.run(events.clone()));
//! tokio::spawn(order_actor.run(OrderContext { products: products.clone(), .. }));
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient<T>` from scripted expectations,
//! so code that depends on another collection can be tested without running it.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response, RevertOutcome, TransactionOutcome};
