//! Error types for the Customer actor.

use collection_actor::FrameworkError;
use thiserror::Error;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    /// The requested customer was not found.
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// A profile for this identity already exists.
    #[error("Customer already exists: {0}")]
    AlreadyExists(String),

    /// The customer data provided is invalid.
    #[error("Customer validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CustomerError {
    fn from(e: FrameworkError) -> Self {
        match e.into_entity_error::<CustomerError>() {
            Ok(domain) => domain,
            Err(FrameworkError::NotFound(id)) => CustomerError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => CustomerError::AlreadyExists(id),
            Err(other) => CustomerError::ActorCommunicationError(other.to_string()),
        }
    }
}
