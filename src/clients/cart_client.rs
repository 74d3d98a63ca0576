use crate::cart_actor::{CartAction, CartActionResult, CartError};
use crate::model::{Cart, CartCreate, CartLine};
use async_trait::async_trait;
use collection_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Cart actor.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
}

#[async_trait]
impl ActorClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<Cart> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        CartError::from(e)
    }
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>) -> Self {
        Self { inner }
    }

    /// Adds a line to the customer's cart, creating the cart on first use.
    /// Returns the line's quantity after merging.
    #[instrument(skip(self, line), fields(product_id = %line.product_id))]
    pub async fn add_line(&self, customer_id: &str, line: CartLine) -> Result<u32, CartError> {
        let params = CartCreate {
            customer_id: customer_id.to_string(),
        };
        match self.inner.create(params).await.map_err(CartError::from) {
            Ok(_) => debug!("Cart created"),
            Err(CartError::AlreadyExists(_)) => {}
            Err(e) => return Err(e),
        }
        match self
            .inner
            .perform_action(customer_id.to_string(), CartAction::Add(line))
            .await?
        {
            CartActionResult::Added { quantity, .. } => Ok(quantity),
            other => Err(CartError::ActorCommunicationError(format!(
                "unexpected action result {other:?}"
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        customer_id: &str,
        index: usize,
        quantity: u32,
    ) -> Result<(), CartError> {
        self.inner
            .perform_action(
                customer_id.to_string(),
                CartAction::SetQuantity { index, quantity },
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_line(&self, customer_id: &str, index: usize) -> Result<CartLine, CartError> {
        match self
            .inner
            .perform_action(customer_id.to_string(), CartAction::Remove { index })
            .await?
        {
            CartActionResult::Removed(line) => Ok(line),
            other => Err(CartError::ActorCommunicationError(format!(
                "unexpected action result {other:?}"
            ))),
        }
    }

    /// Empties the cart. A customer without a cart has nothing to clear.
    #[instrument(skip(self))]
    pub async fn clear(&self, customer_id: &str) -> Result<usize, CartError> {
        match self
            .inner
            .perform_action(customer_id.to_string(), CartAction::Clear)
            .await
            .map_err(CartError::from)
        {
            Ok(CartActionResult::Cleared { removed }) => Ok(removed),
            Ok(other) => Err(CartError::ActorCommunicationError(format!(
                "unexpected action result {other:?}"
            ))),
            Err(CartError::NotFound(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// The cart's lines, empty when the customer has no cart yet.
    pub async fn lines(&self, customer_id: &str) -> Result<Vec<CartLine>, CartError> {
        Ok(self
            .get(customer_id.to_string())
            .await?
            .map(|cart| cart.lines)
            .unwrap_or_default())
    }
}
