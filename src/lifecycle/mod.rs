//! # System Lifecycle
//!
//! Starting, wiring and stopping the collection actors.
//!
//! ## Dependency Injection via Context
//!
//! Actors are created first and wired afterwards through `run(context)`:
//!
//! ```rust,ignore
//! impl ActorEntity for Product {
//!     type Context = EventBus;     // publishes stock snapshots
//! }
//!
//! impl ActorEntity for Order {
//!     type Context = OrderContext; // products, customers, cancelled, events + policies
//! }
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. Drop every client, which closes the sender side of each channel
//! 2. Each actor's `recv()` returns `None` once its queue is drained
//! 3. Await the actor tasks
//!
//! The order actor holds clients of the product, customer and cancelled actors, so it
//! is joined first; the dependency graph is acyclic, so the others follow. The
//! dashboard projection stops when the last event publisher is dropped.

pub mod order_system;

pub use order_system::*;
