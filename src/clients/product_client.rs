//! # Product Client
//!
//! The ledger's public API. Wraps a `ResourceClient<Product>` and turns each stock
//! operation into a [`ProductAction`], so nothing outside the actor can read-then-write
//! `stockByVariant`.
use crate::model::{Product, ProductCreate, ProductUpdate, StockRecord, VariantKey};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError, ReserveLine};
use async_trait::async_trait;
use collection_actor::{
    ActorClient, FrameworkError, ResourceClient, RevertOutcome, TransactionOutcome,
};
use tracing::{debug, info, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ProductError::from(e)
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<String, ProductError> {
        debug!(?params, "create_product called");
        let id = self.inner.create(params).await?;
        info!(product_id = %id, "Product added to catalog");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: String,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        Ok(self.inner.update(id, update).await?)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        self.list().await
    }

    /// Units on hand for a variant; zero when the variant was never stocked.
    ///
    /// A plain read: nothing is staged or written, so no `StockChanged` is published.
    #[instrument(skip(self))]
    pub async fn get_available(
        &self,
        id: &str,
        variant: &VariantKey,
    ) -> Result<u32, ProductError> {
        let product = self
            .get(id.to_string())
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;
        Ok(product.available(variant))
    }

    /// Takes `quantity` units of one variant. Returns what is left.
    #[instrument(skip(self))]
    pub async fn reserve_and_decrement(
        &self,
        id: &str,
        variant: VariantKey,
        quantity: u32,
    ) -> Result<u32, ProductError> {
        match self
            .inner
            .perform_action(id.to_string(), ProductAction::Reserve { variant, quantity })
            .await?
        {
            ProductActionResult::Reserved { remaining, .. } => Ok(remaining),
            other => Err(unexpected(other)),
        }
    }

    /// Admin restock. Returns the new count.
    #[instrument(skip(self))]
    pub async fn add_stock(
        &self,
        id: &str,
        variant: VariantKey,
        quantity: u32,
    ) -> Result<u32, ProductError> {
        match self
            .inner
            .perform_action(id.to_string(), ProductAction::Restock { variant, quantity })
            .await?
        {
            ProductActionResult::Restocked { now, .. } => {
                info!(product_id = id, now, "Stock added");
                Ok(now)
            }
            other => Err(unexpected(other)),
        }
    }

    /// Admin correction. Returns the new count.
    #[instrument(skip(self))]
    pub async fn set_variant_quantity(
        &self,
        id: &str,
        variant: VariantKey,
        quantity: u32,
    ) -> Result<u32, ProductError> {
        match self
            .inner
            .perform_action(id.to_string(), ProductAction::SetQuantity { variant, quantity })
            .await?
        {
            ProductActionResult::QuantitySet { previous, now, .. } => {
                info!(product_id = id, previous, now, "Stock corrected");
                Ok(now)
            }
            other => Err(unexpected(other)),
        }
    }

    /// Reserves every line in one ledger transaction keyed by `key`.
    ///
    /// Either all lines are decremented or none is. Repeating a key that was applied
    /// returns [`TransactionOutcome::Replayed`] and decrements nothing.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn reserve_lines(
        &self,
        key: &str,
        lines: &[ReserveLine],
    ) -> Result<TransactionOutcome<ProductActionResult>, ProductError> {
        let steps = lines
            .iter()
            .map(|line| {
                (
                    line.product_id.clone(),
                    ProductAction::Reserve {
                        variant: line.variant.clone(),
                        quantity: line.quantity,
                    },
                )
            })
            .collect();
        Ok(self.inner.transaction(Some(key.to_string()), steps).await?)
    }

    /// Gives back everything reserved under `key`. Safe to call for a key that was
    /// never applied: the key is then refused if it shows up later.
    #[instrument(skip(self))]
    pub async fn release(&self, key: &str) -> Result<RevertOutcome, ProductError> {
        Ok(self.inner.revert(key).await?)
    }

    /// Puts the lines back on the shelf in one unkeyed transaction. Used for orders
    /// whose reservation is not in the journal, such as seeded ones.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn restock_lines(&self, lines: &[ReserveLine]) -> Result<(), ProductError> {
        let steps = lines
            .iter()
            .map(|line| {
                (
                    line.product_id.clone(),
                    ProductAction::Restock {
                        variant: line.variant.clone(),
                        quantity: line.quantity,
                    },
                )
            })
            .collect();
        self.inner.transaction(None, steps).await?;
        Ok(())
    }

    /// The persisted stock document for one product.
    pub async fn stock_record(&self, id: &str) -> Result<StockRecord, ProductError> {
        self.get(id.to_string())
            .await?
            .map(|product| product.stock_record())
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }
}
