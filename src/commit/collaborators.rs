//! External services the commit path talks to. Only their interfaces live here; the
//! storefront supplies the real implementations.

use crate::model::Order;
use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

/// The signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is signed in.
    async fn current_user(&self) -> Option<Identity>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Payment declined: {0}")]
    Declined(String),
    #[error("Payment cancelled by the customer")]
    Cancelled,
}

#[async_trait]
pub trait PaymentAuthorizer: Send + Sync {
    /// Charges `amount` and returns the gateway's payment reference.
    async fn authorize(&self, amount: Decimal, payer: &Identity) -> Result<String, PaymentError>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the order confirmation to the customer.
    async fn order_confirmed(&self, order: &Order) -> Result<(), NotifyError>;
}

/// An identity fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<Identity>);

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Option<Identity> {
        self.0.clone()
    }
}

/// Writes confirmations to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_confirmed(&self, order: &Order) -> Result<(), NotifyError> {
        info!(
            order_id = %order.order_id,
            to = %order.checkout.email,
            total = %order.total,
            "Order confirmation"
        );
        Ok(())
    }
}
