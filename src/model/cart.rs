use crate::model::{Product, VariantKey, VariantKeyError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Artwork attached to a line for a custom print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    /// e.g. `logo`, `text`, `film`
    pub kind: String,
    /// Where the uploaded artwork lives.
    pub asset_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One line of a cart or a buy-now intent.
///
/// `unit_price` is the price when the line was added; totals are computed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub selected_color: String,
    #[serde(default)]
    pub selected_size: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

impl CartLine {
    /// `None` when the amount does not fit a `Decimal`.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// Custom and film-print lines are numbered separately from standard orders.
    pub fn is_custom(&self) -> bool {
        self.customization.is_some() || self.name.to_lowercase().contains("custom")
    }

    /// The stock slot this line draws from.
    pub fn variant_for(&self, product: &Product) -> Result<VariantKey, VariantKeyError> {
        if product.has_variants() {
            VariantKey::new(&self.selected_color, &self.selected_size)
        } else {
            Ok(VariantKey::default_variant())
        }
    }

    /// Two lines that would merge into one when added to a cart.
    pub fn same_item(&self, other: &CartLine) -> bool {
        self.product_id == other.product_id
            && self.selected_color == other.selected_color
            && self.selected_size == other.selected_size
            && self.customization == other.customization
    }
}

/// A customer's persisted cart, keyed by customer id.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](collection_actor::ActorEntity) trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub customer_id: String,
    pub lines: Vec<CartLine>,
}

/// Payload for creating an empty cart.
#[derive(Debug, Clone)]
pub struct CartCreate {
    pub customer_id: String,
}
