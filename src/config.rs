//! # Configuration
//!
//! [`StoreConfig`] holds the commit-path tunables. Every field has a default and can be
//! overridden with an `ORDER_COMMIT_*` environment variable; a `.env` file in the
//! working directory is loaded first.

use crate::intent::Pricing;
use crate::order_actor::{IdScheme, ReservePolicy};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const TAX_PERCENT_VAR: &str = "ORDER_COMMIT_TAX_PERCENT";
pub const SHIPPING_FEE_VAR: &str = "ORDER_COMMIT_SHIPPING_FEE";
pub const STANDARD_PREFIX_VAR: &str = "ORDER_COMMIT_STANDARD_PREFIX";
pub const CUSTOM_PREFIX_VAR: &str = "ORDER_COMMIT_CUSTOM_PREFIX";
pub const ID_WIDTH_VAR: &str = "ORDER_COMMIT_ID_WIDTH";
pub const RESERVE_ATTEMPTS_VAR: &str = "ORDER_COMMIT_RESERVE_ATTEMPTS";
pub const RESERVE_BACKOFF_MS_VAR: &str = "ORDER_COMMIT_RESERVE_BACKOFF_MS";
pub const RESERVE_TIMEOUT_MS_VAR: &str = "ORDER_COMMIT_RESERVE_TIMEOUT_MS";
pub const RESTOCK_ON_CANCEL_VAR: &str = "ORDER_COMMIT_RESTOCK_ON_CANCEL";
pub const LOW_STOCK_THRESHOLD_VAR: &str = "ORDER_COMMIT_LOW_STOCK_THRESHOLD";
pub const CHANNEL_BUFFER_VAR: &str = "ORDER_COMMIT_CHANNEL_BUFFER";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

fn invalid(var: &'static str, value: impl ToString, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub tax_percent: Decimal,
    pub shipping_fee: Decimal,
    pub standard_prefix: String,
    pub custom_prefix: String,
    pub id_width: usize,
    pub reserve_attempts: u32,
    pub reserve_backoff_ms: u64,
    pub reserve_timeout_ms: u64,
    /// Give stock back when an order is cancelled. Off by default: cancelled goods are
    /// written off.
    pub restock_on_cancel: bool,
    pub low_stock_threshold: u32,
    /// Capacity of every actor's request channel and of the event bus.
    pub channel_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tax_percent: Decimal::from(5),
            shipping_fee: Decimal::from(20),
            standard_prefix: "ORD".into(),
            custom_prefix: "CST".into(),
            id_width: 4,
            reserve_attempts: 3,
            reserve_backoff_ms: 50,
            reserve_timeout_ms: 2000,
            restock_on_cancel: false,
            low_stock_threshold: 5,
            channel_buffer: 32,
        }
    }
}

fn parse<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, raw, e.to_string()))
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, raw, "expected true or false")),
    }
}

impl StoreConfig {
    /// Defaults overridden by the process environment (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(TAX_PERCENT_VAR) {
            config.tax_percent = parse(TAX_PERCENT_VAR, &raw)?;
        }
        if let Some(raw) = lookup(SHIPPING_FEE_VAR) {
            config.shipping_fee = parse(SHIPPING_FEE_VAR, &raw)?;
        }
        if let Some(raw) = lookup(STANDARD_PREFIX_VAR) {
            config.standard_prefix = raw.trim().to_string();
        }
        if let Some(raw) = lookup(CUSTOM_PREFIX_VAR) {
            config.custom_prefix = raw.trim().to_string();
        }
        if let Some(raw) = lookup(ID_WIDTH_VAR) {
            config.id_width = parse(ID_WIDTH_VAR, &raw)?;
        }
        if let Some(raw) = lookup(RESERVE_ATTEMPTS_VAR) {
            config.reserve_attempts = parse(RESERVE_ATTEMPTS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(RESERVE_BACKOFF_MS_VAR) {
            config.reserve_backoff_ms = parse(RESERVE_BACKOFF_MS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(RESERVE_TIMEOUT_MS_VAR) {
            config.reserve_timeout_ms = parse(RESERVE_TIMEOUT_MS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(RESTOCK_ON_CANCEL_VAR) {
            config.restock_on_cancel = parse_bool(RESTOCK_ON_CANCEL_VAR, &raw)?;
        }
        if let Some(raw) = lookup(LOW_STOCK_THRESHOLD_VAR) {
            config.low_stock_threshold = parse(LOW_STOCK_THRESHOLD_VAR, &raw)?;
        }
        if let Some(raw) = lookup(CHANNEL_BUFFER_VAR) {
            config.channel_buffer = parse(CHANNEL_BUFFER_VAR, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tax_percent.is_sign_negative() {
            return Err(invalid(TAX_PERCENT_VAR, self.tax_percent, "must not be negative"));
        }
        if self.shipping_fee.is_sign_negative() {
            return Err(invalid(SHIPPING_FEE_VAR, self.shipping_fee, "must not be negative"));
        }
        for (var, prefix) in [
            (STANDARD_PREFIX_VAR, &self.standard_prefix),
            (CUSTOM_PREFIX_VAR, &self.custom_prefix),
        ] {
            if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(invalid(var, prefix, "must be one or more ASCII letters"));
            }
        }
        if self.standard_prefix == self.custom_prefix {
            return Err(invalid(
                CUSTOM_PREFIX_VAR,
                &self.custom_prefix,
                "must differ from the standard prefix",
            ));
        }
        if !(1..=12).contains(&self.id_width) {
            return Err(invalid(ID_WIDTH_VAR, self.id_width, "must be between 1 and 12"));
        }
        if self.reserve_attempts == 0 {
            return Err(invalid(RESERVE_ATTEMPTS_VAR, 0, "at least one attempt is needed"));
        }
        if self.reserve_timeout_ms == 0 {
            return Err(invalid(RESERVE_TIMEOUT_MS_VAR, 0, "must be positive"));
        }
        if self.channel_buffer == 0 {
            return Err(invalid(CHANNEL_BUFFER_VAR, 0, "must be positive"));
        }
        Ok(())
    }

    pub fn pricing(&self) -> Pricing {
        Pricing {
            tax_percent: self.tax_percent,
            shipping_fee: self.shipping_fee,
        }
    }

    pub fn reserve_policy(&self) -> ReservePolicy {
        ReservePolicy {
            attempts: self.reserve_attempts,
            backoff: Duration::from_millis(self.reserve_backoff_ms),
            timeout: Duration::from_millis(self.reserve_timeout_ms),
        }
    }

    pub fn id_scheme(&self) -> IdScheme {
        IdScheme {
            standard_prefix: self.standard_prefix.clone(),
            custom_prefix: self.custom_prefix.clone(),
            width: self.id_width,
        }
    }
}
