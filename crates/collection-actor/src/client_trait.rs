//! # ActorClient Trait
//!
//! A common interface for collection-specific clients. It adds default `get`, `list` and
//! `delete` methods on top of a generic `ResourceClient`, translated into the client's
//! own error type.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for collection-specific clients to inherit the standard reads and deletes.
///
/// # Example
///
/// ```rust,ignore
/// struct CustomerClient {
///     inner: ResourceClient<Customer>,
/// }
///
/// #[async_trait]
/// impl ActorClient<Customer> for CustomerClient {
///     type Error = CustomerError;
///
///     fn inner(&self) -> &ResourceClient<Customer> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         CustomerError::from(e)
///     }
/// }
///
/// // get(), list() and delete() come for free
/// let customer = client.get(uid).await?;
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The collection-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a document by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every document.
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Delete a document by id.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
