//! # Commit Orchestrator
//!
//! The one place where the ledger, the sequencer, the customer profile and the cart
//! meet. See [`CommitOrchestrator::commit_order`] for the order of effects.

pub mod collaborators;
pub mod error;
pub mod orchestrator;

pub use collaborators::*;
pub use error::*;
pub use orchestrator::*;
