//! # Observability
//!
//! Structured logging for every collection actor and the services built on them.
//!
//! Actors log with an `entity_type` field instead of module paths, so the subscriber
//! hides targets. Verbosity comes from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run     # one line per committed change
//! RUST_LOG=debug cargo run    # full request payloads
//! ```
//!
//! With `RUST_LOG=info` a checkout reads roughly like:
//!
//! ```text
//! INFO Transaction committed entity_type="Product" touched=2
//! INFO Created entity_type="Order" id=ORD0001 size=1
//! INFO Order committed order_id="ORD0001" total=1385.00
//! ```

/// Installs the global subscriber. Calling it twice panics, so binaries call it once
/// at startup and tests use [`try_setup_tracing`].
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but leaves an already installed subscriber in place.
pub fn try_setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init();
}
