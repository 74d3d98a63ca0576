use crate::commit::Identity;
use crate::customer_actor::{CustomerAction, CustomerActionResult, CustomerError};
use crate::model::{Address, Customer, CustomerCreate, CustomerUpdate};
use async_trait::async_trait;
use collection_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

#[async_trait]
impl ActorClient<Customer> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &ResourceClient<Customer> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        CustomerError::from(e)
    }
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<Customer>) -> Self {
        Self { inner }
    }

    /// Creates the profile for `identity` unless it already exists.
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn ensure_customer(&self, identity: &Identity) -> Result<String, CustomerError> {
        let params = CustomerCreate {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
        };
        match self.inner.create(params).await.map_err(CustomerError::from) {
            Ok(uid) => {
                debug!("Customer profile created");
                Ok(uid)
            }
            Err(CustomerError::AlreadyExists(uid)) => Ok(uid),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_customer(
        &self,
        uid: String,
        update: CustomerUpdate,
    ) -> Result<Customer, CustomerError> {
        Ok(self.inner.update(uid, update).await?)
    }

    /// Links an order to the customer. Returns whether `billing` was a new address.
    #[instrument(skip(self, billing))]
    pub async fn record_order(
        &self,
        uid: &str,
        order_id: &str,
        billing: Address,
    ) -> Result<bool, CustomerError> {
        let action = CustomerAction::RecordOrder {
            order_id: order_id.to_string(),
            billing,
        };
        match self.inner.perform_action(uid.to_string(), action).await? {
            CustomerActionResult::OrderRecorded { address_added } => Ok(address_added),
        }
    }
}
