use crate::cancelled_actor::CancelledError;
use crate::model::{CancelledOrder, CancelledOrderCreate, Order};
use async_trait::async_trait;
use collection_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{info, instrument};

/// Client for the append-only cancelled-orders collection.
#[derive(Clone)]
pub struct CancelledClient {
    inner: ResourceClient<CancelledOrder>,
}

#[async_trait]
impl ActorClient<CancelledOrder> for CancelledClient {
    type Error = CancelledError;

    fn inner(&self) -> &ResourceClient<CancelledOrder> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        CancelledError::from(e)
    }
}

impl CancelledClient {
    pub fn new(inner: ResourceClient<CancelledOrder>) -> Self {
        Self { inner }
    }

    /// Writes the cancellation record for `order` and returns it.
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn record(&self, order: Order, reason: &str) -> Result<CancelledOrder, CancelledError> {
        let params = CancelledOrderCreate {
            order,
            reason: reason.to_string(),
        };
        let id = self.inner.create(params).await?;
        info!(%id, "Cancellation recorded");
        self.get(id.clone())
            .await?
            .ok_or(CancelledError::NotFound(id))
    }
}
