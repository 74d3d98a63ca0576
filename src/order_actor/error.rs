//! Error types for the Order actor.

use crate::model::{OrderStatus, VariantKey};
use crate::product_actor::ProductError;
use collection_actor::FrameworkError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The allocated id is taken even after regeneration.
    #[error("Order already exists: {0}")]
    AlreadyExists(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// A line asked for more than the ledger holds.
    #[error("Insufficient stock for {product_id} {variant}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        variant: VariantKey,
        requested: u32,
        available: u32,
    },

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// A line the ledger refused for a reason other than stock.
    #[error("Invalid order line: {0}")]
    InvalidLine(String),

    /// Stock was already reserved under this payment reference by another order.
    #[error("Payment {0} was already used for an order")]
    DuplicatePayment(String),

    /// The payment reference was rolled back and cannot be committed again.
    #[error("Payment {0} was revoked")]
    PaymentRevoked(String),

    /// The ledger could not be reached within the retry budget.
    #[error("Stock reservation failed after {attempts} attempts: {reason}")]
    ReservationFailed { attempts: u32, reason: String },

    /// Stock was reserved but the order could not be linked to the customer.
    #[error("Order could not be persisted: {0}")]
    PersistenceFailed(String),

    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("A cancellation needs a reason")]
    MissingReason,

    /// Orders change only through status actions and are never deleted.
    #[error("Order {0} cannot be modified this way")]
    Immutable(String),

    #[error("Cancellation record could not be written: {0}")]
    CancellationFailed(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<ProductError> for OrderError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::InsufficientStock {
                product_id,
                variant,
                requested,
                available,
            } => OrderError::InsufficientStock {
                product_id,
                variant,
                requested,
                available,
            },
            ProductError::NotFound(id) => OrderError::UnknownProduct(id),
            ProductError::ReservationRevoked(key) => OrderError::PaymentRevoked(key),
            ProductError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
            other => OrderError::InvalidLine(other.to_string()),
        }
    }
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e.into_entity_error::<OrderError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => OrderError::AlreadyExists(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
