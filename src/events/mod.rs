//! # Read Model
//!
//! Writers publish a [`StoreEvent`] after each committed change; the
//! [`DashboardProjection`] folds them into [`Dashboard`] snapshots that admin views
//! watch instead of re-listing whole collections.

pub mod bus;
pub mod projection;

pub use bus::*;
pub use projection::*;
