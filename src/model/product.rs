use crate::model::VariantKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A catalog product together with its per-variant stock.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](collection_actor::ActorEntity) trait, so
/// the whole stock ledger lives inside one
/// [`ResourceActor`](collection_actor::ResourceActor). Stock only changes through
/// [`ProductAction`](crate::product_actor::ProductAction)s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub mrp: Decimal,
    pub sale_price: Decimal,
    #[serde(default)]
    pub available_colors: BTreeSet<String>,
    #[serde(default)]
    pub available_sizes: BTreeSet<String>,
    pub stock_by_variant: BTreeMap<VariantKey, u32>,
    pub total_stock: u64,
}

impl Product {
    /// True when the product is sold by colour and size.
    pub fn has_variants(&self) -> bool {
        !self.available_colors.is_empty() || !self.available_sizes.is_empty()
    }

    /// Whether `variant` is a sellable combination of this product.
    pub fn declares(&self, variant: &VariantKey) -> bool {
        if self.has_variants() {
            self.available_colors.contains(variant.color())
                && self.available_sizes.contains(variant.size())
        } else {
            *variant == VariantKey::default_variant()
        }
    }

    /// Units on hand for `variant`; an unknown variant has none.
    pub fn available(&self, variant: &VariantKey) -> u32 {
        self.stock_by_variant.get(variant).copied().unwrap_or(0)
    }

    pub fn recompute_total(&mut self) {
        self.total_stock = self.stock_by_variant.values().map(|q| u64::from(*q)).sum();
    }

    /// The stored stock document.
    pub fn stock_record(&self) -> StockRecord {
        StockRecord {
            id: self.product_id.clone(),
            stock_by_variant: self.stock_by_variant.clone(),
            stock: self.total_stock,
        }
    }
}

/// Stock as persisted: `{id, stockByVariant, stock}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub id: String,
    pub stock_by_variant: BTreeMap<VariantKey, u32>,
    pub stock: u64,
}

/// Payload for adding a product to the catalog.
///
/// Without a `product_id` the catalog numbers it (`MP001`, `MP002`, ...).
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub product_id: Option<String>,
    pub name: String,
    pub category: String,
    pub mrp: Decimal,
    pub sale_price: Decimal,
    pub available_colors: BTreeSet<String>,
    pub available_sizes: BTreeSet<String>,
    pub initial_stock: BTreeMap<VariantKey, u32>,
}

/// Catalog edits. Stock is deliberately absent: it only moves through actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub mrp: Option<Decimal>,
    pub sale_price: Option<Decimal>,
}
