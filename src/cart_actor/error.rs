//! Error types for the Cart actor.

use collection_actor::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),

    #[error("Cart already exists: {0}")]
    AlreadyExists(String),

    /// Line quantities start at one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("Cart has no line {index} ({len} lines)")]
    NoSuchLine { index: usize, len: usize },

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CartError {
    fn from(e: FrameworkError) -> Self {
        match e.into_entity_error::<CartError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => CartError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => CartError::AlreadyExists(id),
            Err(other) => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}
