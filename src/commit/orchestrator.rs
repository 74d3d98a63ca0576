use super::collaborators::{Identity, IdentityProvider, Notifier, PaymentAuthorizer};
use super::error::CommitError;
use crate::clients::{CartClient, CustomerClient, OrderClient, ProductClient};
use crate::intent::{validate, IntentSource, OrderIntent, Pricing};
use crate::model::{Channel, Order, OrderDraft};
use crate::order_actor::OrderError;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Turns a paid order intent into a committed order.
///
/// The order actor does the part that must be atomic (stock reservation and the
/// customer link) and announces the stored order. Everything after the order is stored
/// is best effort: a failed notification or cart clear is logged and the order stands.
#[derive(Clone)]
pub struct CommitOrchestrator {
    products: ProductClient,
    customers: CustomerClient,
    carts: CartClient,
    orders: OrderClient,
    notifier: Arc<dyn Notifier>,
    pricing: Pricing,
}

impl CommitOrchestrator {
    pub fn new(
        products: ProductClient,
        customers: CustomerClient,
        carts: CartClient,
        orders: OrderClient,
        notifier: Arc<dyn Notifier>,
        pricing: Pricing,
    ) -> Self {
        Self {
            products,
            customers,
            carts,
            orders,
            notifier,
            pricing,
        }
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    /// Validates, takes payment, then commits.
    ///
    /// Nothing is charged unless the customer is signed in and the intent passes
    /// validation, including the displayed-stock check. The amount charged and the
    /// order stored come from the same lines.
    #[instrument(skip_all, fields(lines = intent.lines.len()))]
    pub async fn checkout(
        &self,
        identity: &dyn IdentityProvider,
        authorizer: &dyn PaymentAuthorizer,
        intent: &OrderIntent,
    ) -> Result<Order, CommitError> {
        let identity = identity
            .current_user()
            .await
            .ok_or(CommitError::NotAuthenticated)?;
        let intent = self.resolve(&identity, intent).await?;
        let catalog = self
            .products
            .list_products()
            .await
            .map_err(|e| CommitError::Store(e.to_string()))?;
        let valid =
            validate(&intent, &catalog, &self.pricing, true).map_err(CommitError::Invalid)?;

        let reference = authorizer
            .authorize(valid.totals.total, &identity)
            .await
            .map_err(|e| CommitError::PaymentNotAuthorized(e.to_string()))?;
        info!(payment = %reference, total = %valid.totals.total, "Payment authorized");

        self.commit(&identity, &intent, &reference).await
    }

    /// Commits an intent that has already been paid for under `payment_reference`.
    #[instrument(skip_all, fields(payment = %payment_reference))]
    pub async fn commit_order(
        &self,
        identity: Option<&Identity>,
        intent: &OrderIntent,
        payment_reference: &str,
    ) -> Result<Order, CommitError> {
        let identity = identity.ok_or(CommitError::NotAuthenticated)?;
        if payment_reference.trim().is_empty() {
            return Err(CommitError::PaymentNotAuthorized(
                "missing payment reference".into(),
            ));
        }
        let intent = self.resolve(identity, intent).await?;
        self.commit(identity, &intent, payment_reference).await
    }

    /// The intent with the lines it is priced from. A cart checkout takes the persisted
    /// cart, whatever lines the client sent along.
    async fn resolve(
        &self,
        identity: &Identity,
        intent: &OrderIntent,
    ) -> Result<OrderIntent, CommitError> {
        let mut resolved = intent.clone();
        if intent.source == IntentSource::Cart {
            resolved.lines = self
                .carts
                .lines(&identity.uid)
                .await
                .map_err(|e| CommitError::Store(e.to_string()))?;
            if resolved.lines != intent.lines {
                debug!(customer_id = %identity.uid, "Using the stored cart in place of the submitted lines");
            }
        }
        Ok(resolved)
    }

    async fn commit(
        &self,
        identity: &Identity,
        intent: &OrderIntent,
        payment_reference: &str,
    ) -> Result<Order, CommitError> {
        let catalog = self
            .products
            .list_products()
            .await
            .map_err(|e| CommitError::Store(e.to_string()))?;
        let valid = validate(intent, &catalog, &self.pricing, false)
            .map_err(CommitError::IntentChanged)?;

        self.customers
            .ensure_customer(identity)
            .await
            .map_err(|e| CommitError::Store(e.to_string()))?;

        let mut checkout = intent.checkout.clone();
        checkout.payment_id = payment_reference.trim().to_string();
        if checkout.date.trim().is_empty() {
            checkout.date = Utc::now().format("%Y-%m-%d").to_string();
        }
        let draft = OrderDraft {
            customer_id: identity.uid.clone(),
            channel: intent.channel,
            checkout,
            lines: valid.lines,
            shipping_address: intent.shipping_address(),
            subtotal: valid.totals.subtotal,
            tax: valid.totals.tax,
            shipping_fee: valid.totals.shipping_fee,
            total: valid.totals.total,
        };

        let order = self
            .orders
            .place_order(draft)
            .await
            .map_err(|e| commit_error(e, intent))?;
        info!(order_id = %order.order_id, total = %order.total, "Order placed");

        if order.channel == Channel::Online {
            let notifier = Arc::clone(&self.notifier);
            let confirmed = order.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.order_confirmed(&confirmed).await {
                    warn!(order_id = %confirmed.order_id, error = %e, "Confirmation not sent");
                }
            });
        }

        if intent.source == IntentSource::Cart {
            if let Err(e) = self.carts.clear(&identity.uid).await {
                warn!(order_id = %order.order_id, error = %e, "Cart not cleared");
            }
        }

        Ok(order)
    }
}

/// Translates an order-actor failure, naming the offending line where there is one.
fn commit_error(e: OrderError, intent: &OrderIntent) -> CommitError {
    match e {
        OrderError::InsufficientStock {
            product_id,
            variant,
            requested,
            available,
        } => {
            let name = intent
                .lines
                .iter()
                .find(|line| line.product_id == product_id)
                .map_or_else(|| product_id.clone(), |line| line.name.clone());
            CommitError::InsufficientStock {
                name,
                product_id,
                variant,
                requested,
                available,
            }
        }
        OrderError::DuplicatePayment(key) => CommitError::DuplicatePayment(key),
        OrderError::PaymentRevoked(key) => CommitError::PaymentRevoked(key),
        e @ OrderError::ReservationFailed { .. } => CommitError::ReservationFailed(e.to_string()),
        OrderError::ActorCommunicationError(msg) => CommitError::Store(msg),
        other => CommitError::OrderPersistenceFailed(other.to_string()),
    }
}
