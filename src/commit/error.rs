use crate::intent::IntentError;
use crate::model::VariantKey;
use thiserror::Error;

/// Why a checkout or commit did not produce an order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommitError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Payment not authorized: {0}")]
    PaymentNotAuthorized(String),

    /// The intent failed validation before payment was requested.
    #[error("Invalid order: {0}")]
    Invalid(IntentError),

    /// The intent no longer validates against the catalog after payment.
    #[error("Order changed after payment: {0}")]
    IntentChanged(IntentError),

    #[error("Insufficient stock for {name} ({variant}): requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        product_id: String,
        variant: VariantKey,
        requested: u32,
        available: u32,
    },

    #[error("Payment {0} was already used for an order")]
    DuplicatePayment(String),

    #[error("Payment {0} was revoked")]
    PaymentRevoked(String),

    #[error("Stock reservation failed: {0}")]
    ReservationFailed(String),

    #[error("Order could not be saved: {0}")]
    OrderPersistenceFailed(String),

    #[error("Store unavailable: {0}")]
    Store(String),
}

impl CommitError {
    /// Whether the customer may have been charged when this error happened.
    pub fn payment_taken(&self) -> bool {
        !matches!(
            self,
            CommitError::NotAuthenticated
                | CommitError::PaymentNotAuthorized(_)
                | CommitError::Invalid(_)
        )
    }

    /// The message shown to the customer.
    pub fn user_message(&self) -> String {
        let outcome = match self {
            CommitError::NotAuthenticated => return "Please sign in to place your order.".into(),
            CommitError::PaymentNotAuthorized(_) => {
                return "Payment was not completed. Your order was not placed.".into()
            }
            CommitError::Invalid(e) => return format!("Your order was not placed: {e}."),
            CommitError::InsufficientStock {
                name,
                variant,
                available,
                ..
            } => format!("{name} ({variant}) has only {available} left"),
            CommitError::DuplicatePayment(_) => "This payment was already used for an order".into(),
            CommitError::IntentChanged(e) => format!("Your order changed during payment: {e}"),
            _ => "Something went wrong while saving your order".into(),
        };
        format!("{outcome}. Your order may not have completed and you may have been charged; please contact support.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_before_payment_do_not_mention_support() {
        for err in [
            CommitError::NotAuthenticated,
            CommitError::PaymentNotAuthorized("declined".into()),
            CommitError::Invalid(IntentError::EmptyIntent),
        ] {
            assert!(!err.payment_taken());
            assert!(!err.user_message().contains("contact support"), "{err:?}");
        }
    }

    #[test]
    fn test_messages_after_payment_ask_for_support() {
        let stock = CommitError::InsufficientStock {
            name: "Plain Tee".into(),
            product_id: "MP010".into(),
            variant: VariantKey::new("Black", "M").unwrap(),
            requested: 2,
            available: 0,
        };
        assert!(stock.payment_taken());
        let message = stock.user_message();
        assert!(message.starts_with("Plain Tee (Black-M) has only 0 left."));
        assert!(message.contains("contact support"));

        let failed = CommitError::OrderPersistenceFailed("customer actor closed".into());
        assert!(failed.payment_taken());
        assert!(failed.user_message().contains("contact support"));
    }
}
