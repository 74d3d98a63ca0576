//! Bounded retry around the ledger reservation.
//!
//! All lines of an order are reserved in one ledger transaction keyed by the payment
//! reference. Only transport failures and timeouts are retried; a ledger refusal such
//! as insufficient stock is final. Because the key makes the transaction idempotent,
//! a retry after a lost reply comes back as a replay instead of a second decrement.

use super::error::OrderError;
use crate::clients::ProductClient;
use crate::product_actor::{ProductActionResult, ReserveLine};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservePolicy {
    /// At least one attempt is always made.
    pub attempts: u32,
    /// Delay before the second attempt; doubled for each one after.
    pub backoff: Duration,
    /// Per-attempt limit.
    pub timeout: Duration,
}

impl Default for ReservePolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(50),
            timeout: Duration::from_millis(2000),
        }
    }
}

impl ReservePolicy {
    fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Reserves `lines` under `key`, retrying transient failures.
///
/// A replay on the first attempt means another order already holds this payment's
/// reservation. When every attempt fails the key is released, which also refuses any
/// attempt still queued in the ledger.
pub async fn reserve_with_retry(
    products: &ProductClient,
    key: &str,
    lines: &[ReserveLine],
    policy: &ReservePolicy,
) -> Result<Vec<ProductActionResult>, OrderError> {
    let attempts = policy.attempts.max(1);
    let mut reason = String::new();

    for attempt in 1..=attempts {
        match timeout(policy.timeout, products.reserve_lines(key, lines)).await {
            Ok(Ok(outcome)) if outcome.is_replay() && attempt == 1 => {
                warn!(%key, "Payment already holds a reservation");
                return Err(OrderError::DuplicatePayment(key.to_string()));
            }
            Ok(Ok(outcome)) => {
                if outcome.is_replay() {
                    info!(%key, attempt, "Earlier attempt had been applied");
                }
                return Ok(outcome.into_results());
            }
            Ok(Err(e)) if !e.is_transient() => return Err(OrderError::from(e)),
            Ok(Err(e)) => {
                warn!(%key, attempt, error = %e, "Reservation attempt failed");
                reason = e.to_string();
            }
            Err(_) => {
                warn!(%key, attempt, timeout_ms = policy.timeout.as_millis() as u64, "Reservation attempt timed out");
                reason = format!("timed out after {:?}", policy.timeout);
            }
        }
        if attempt < attempts {
            sleep(policy.delay_after(attempt)).await;
        }
    }

    release(products, key).await;
    Err(OrderError::ReservationFailed { attempts, reason })
}

/// Compensating release. Only logged: the caller is already failing.
pub async fn release(products: &ProductClient, key: &str) {
    match products.release(key).await {
        Ok(outcome) => warn!(%key, ?outcome, "Reservation released"),
        Err(e) => error!(%key, error = %e, "Compensating release failed"),
    }
}
