//! Error types for the Product actor.

use crate::model::{VariantKey, VariantKeyError};
use collection_actor::FrameworkError;
use thiserror::Error;

/// Errors that can occur during product and stock operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// A product with this id is already in the catalog.
    #[error("Product already exists: {0}")]
    AlreadyExists(String),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock for {product_id} {variant}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        variant: VariantKey,
        requested: u32,
        available: u32,
    },

    /// Zero, or a restock that would overflow the counter.
    #[error("Invalid quantity {quantity} for {product_id} {variant}")]
    InvalidQuantity {
        product_id: String,
        variant: VariantKey,
        quantity: u32,
    },

    /// The variant is not one of the product's declared colour/size combinations.
    #[error("Product {product_id} has no variant {variant}")]
    UnknownVariant {
        product_id: String,
        variant: VariantKey,
    },

    /// The catalog data provided is invalid.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    #[error(transparent)]
    Variant(#[from] VariantKeyError),

    /// The reservation key was rolled back and cannot be used again.
    #[error("Reservation {0} was revoked")]
    ReservationRevoked(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl ProductError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProductError::ActorCommunicationError(_))
    }
}

impl From<FrameworkError> for ProductError {
    fn from(e: FrameworkError) -> Self {
        match e.into_entity_error::<ProductError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => ProductError::AlreadyExists(id),
            Err(FrameworkError::Revoked(key)) => ProductError::ReservationRevoked(key),
            Err(other) => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}
