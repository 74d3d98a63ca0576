//! Checks an intent against the catalog before anyone is charged.
//!
//! The stock check here is advisory: it compares against what the storefront shows.
//! The ledger repeats the check atomically when the order is committed.

use super::totals::{compute_totals, Pricing, Totals};
use super::{IntentSource, OrderIntent};
use crate::model::{CartLine, OrderLine, Product, VariantKey, VariantKeyError};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum IntentError {
    #[error("Nothing to order")]
    EmptyIntent,

    #[error("{name}: quantity must be at least 1")]
    InvalidQuantity { name: String },

    #[error("{name}: price cannot be negative")]
    NegativePrice { name: String },

    /// A buy-now line must carry the current catalog price.
    #[error("{name}: price is now {current}, not {offered}")]
    PriceChanged {
        name: String,
        offered: Decimal,
        current: Decimal,
    },

    #[error("Order amount is too large")]
    AmountOutOfRange,

    #[error("{name}: product {product_id} is no longer in the catalog")]
    UnknownProduct { name: String, product_id: String },

    #[error("{name}: please choose a {field}")]
    MissingVariant { name: String, field: &'static str },

    #[error("{name}: {variant} is not offered")]
    UndeclaredVariant { name: String, variant: VariantKey },

    #[error("{name}: {source}")]
    Variant {
        name: String,
        source: VariantKeyError,
    },

    #[error("{name}: only {available} left of {variant}, {requested} requested")]
    ExceedsAvailable {
        name: String,
        variant: VariantKey,
        requested: u64,
        available: u32,
    },

    #[error("{name}: the customisation has no uploaded artwork")]
    IncompleteCustomization { name: String },

    #[error("Checkout field '{0}' is required")]
    MissingCheckoutField(&'static str),

    /// The price the customer saw differs from the recomputed one.
    #[error("Prices changed: quoted {quoted}, now {actual}")]
    StaleQuote { quoted: Decimal, actual: Decimal },
}

/// An intent that passed validation: frozen order lines and the recomputed totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedIntent {
    pub lines: Vec<OrderLine>,
    pub totals: Totals,
}

fn resolve_variant(line: &CartLine, product: &Product) -> Result<VariantKey, IntentError> {
    if product.has_variants() {
        if line.selected_color.trim().is_empty() {
            return Err(IntentError::MissingVariant {
                name: line.name.clone(),
                field: "color",
            });
        }
        if line.selected_size.trim().is_empty() {
            return Err(IntentError::MissingVariant {
                name: line.name.clone(),
                field: "size",
            });
        }
    }
    let variant = line.variant_for(product).map_err(|source| IntentError::Variant {
        name: line.name.clone(),
        source,
    })?;
    if !product.declares(&variant) {
        return Err(IntentError::UndeclaredVariant {
            name: line.name.clone(),
            variant,
        });
    }
    Ok(variant)
}

/// Validates `intent` against `catalog` and recomputes its totals.
///
/// Cart lines keep the price they were added at; a buy-now line must match the current
/// sale price. With `check_stock`, lines for the same variant are added up and compared
/// with the displayed availability.
pub fn validate(
    intent: &OrderIntent,
    catalog: &[Product],
    pricing: &Pricing,
    check_stock: bool,
) -> Result<ValidatedIntent, IntentError> {
    if intent.lines.is_empty() {
        return Err(IntentError::EmptyIntent);
    }

    let products: HashMap<&str, &Product> = catalog
        .iter()
        .map(|p| (p.product_id.as_str(), p))
        .collect();
    let mut lines = Vec::with_capacity(intent.lines.len());
    let mut requested: BTreeMap<(&str, VariantKey), (u64, &str)> = BTreeMap::new();

    for line in &intent.lines {
        if line.quantity == 0 {
            return Err(IntentError::InvalidQuantity {
                name: line.name.clone(),
            });
        }
        if line.unit_price < Decimal::ZERO {
            return Err(IntentError::NegativePrice {
                name: line.name.clone(),
            });
        }
        let product = products
            .get(line.product_id.as_str())
            .copied()
            .ok_or_else(|| IntentError::UnknownProduct {
                name: line.name.clone(),
                product_id: line.product_id.clone(),
            })?;
        if intent.source == IntentSource::BuyNow && line.unit_price != product.sale_price {
            return Err(IntentError::PriceChanged {
                name: line.name.clone(),
                offered: line.unit_price,
                current: product.sale_price,
            });
        }
        let variant = resolve_variant(line, product)?;
        if let Some(custom) = &line.customization {
            if custom.asset_ref.trim().is_empty() {
                return Err(IntentError::IncompleteCustomization {
                    name: line.name.clone(),
                });
            }
        }

        let entry = requested
            .entry((product.product_id.as_str(), variant.clone()))
            .or_insert((0, line.name.as_str()));
        entry.0 += u64::from(line.quantity);
        let subtotal = line.subtotal().ok_or(IntentError::AmountOutOfRange)?;
        lines.push(OrderLine::from_cart_line(line, &variant, subtotal));
    }

    if check_stock {
        for ((product_id, variant), (quantity, name)) in &requested {
            let available = products[product_id].available(variant);
            if *quantity > u64::from(available) {
                return Err(IntentError::ExceedsAvailable {
                    name: name.to_string(),
                    variant: variant.clone(),
                    requested: *quantity,
                    available,
                });
            }
        }
    }

    let checkout = &intent.checkout;
    for (field, value) in [
        ("fullname", &checkout.fullname),
        ("email", &checkout.email),
        ("contact", &checkout.contact),
        ("street", &checkout.street),
        ("city", &checkout.city),
        ("state", &checkout.state),
        ("zip", &checkout.zip),
        ("country", &checkout.country),
    ] {
        if value.trim().is_empty() {
            return Err(IntentError::MissingCheckoutField(field));
        }
    }

    let totals = compute_totals(&intent.lines, pricing)?;
    if let Some(quoted) = intent.quoted_total {
        if quoted != totals.total {
            return Err(IntentError::StaleQuote {
                quoted,
                actual: totals.total,
            });
        }
    }

    Ok(ValidatedIntent { lines, totals })
}
