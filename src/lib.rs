//! # Order Commit
//!
//! > **Variant stock reservation and order commit for a storefront.**
//!
//! A checkout turns a cart (or a single buy-now line) into a stored order. On the way
//! it has to take stock from the right colour/size slot, number the order, link it to
//! the customer and empty the cart, and it has to do that correctly when two customers
//! race for the last unit.
//!
//! ## Core Concepts
//!
//! ### One actor per collection
//! Every collection (products, customers, carts, orders, cancelled orders) lives inside
//! a [`ResourceActor`](collection_actor::ResourceActor). The actor processes one request
//! at a time, so a stock decrement can never interleave with another one: there is no
//! read-then-write race to lose.
//!
//! ### Keyed ledger transactions
//! An order's lines are reserved in a single ledger transaction keyed by the payment
//! reference. Either every line is decremented or none is, and the same payment can
//! never reserve twice. See [`order_actor::reservation`].
//!
//! ### Typed errors at every seam
//! Each actor has its own error enum; the clients map
//! [`FrameworkError`](collection_actor::FrameworkError)s back into it, and the commit
//! path folds them into a [`CommitError`](commit::CommitError) that knows whether the
//! customer may already have been charged.
//!
//! ## Module Tour
//!
//! ### 1. The Data ([`model`])
//! Products with per-variant stock, customers, carts, orders and cancellation records.
//! - **Key items**: [`VariantKey`](model::VariantKey), [`OrderStatus`](model::OrderStatus).
//!
//! ### 2. The Collections ([`product_actor`], [`customer_actor`], [`cart_actor`], [`order_actor`], [`cancelled_actor`])
//! `ActorEntity` implementations. The product actor is the stock ledger; the order actor
//! is the order sequencer and reserves stock when an order is created.
//!
//! ### 3. The Interface ([`clients`])
//! Domain clients over the generic `ResourceClient`.
//! - **Key items**: [`ProductClient`](clients::ProductClient), [`OrderClient`](clients::OrderClient).
//!
//! ### 4. The Workflow ([`intent`], [`commit`])
//! Builds and validates an [`OrderIntent`](intent::OrderIntent), takes payment and
//! commits it through the [`CommitOrchestrator`](commit::CommitOrchestrator).
//!
//! ### 5. The Runtime ([`lifecycle`], [`config`], [`events`])
//! Starts and stops the actors, reads `ORDER_COMMIT_*` settings and keeps the admin
//! dashboard up to date.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod cancelled_actor;
pub mod cart_actor;
pub mod clients;
pub mod commit;
pub mod config;
pub mod customer_actor;
pub mod events;
pub mod intent;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod product_actor;
