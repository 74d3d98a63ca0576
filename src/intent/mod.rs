//! # Cart / Order-Intent Builder
//!
//! An [`OrderIntent`] is a candidate order before payment: lines from the persisted
//! cart or a single buy-now line, the checkout form and the channel. Totals are always
//! recomputed with [`compute_totals`] from server-held prices: the cart's add-time
//! snapshot or the current sale price for a buy-now line. A total the client quoted is
//! only compared, never trusted.

pub mod totals;
pub mod validation;

pub use totals::*;
pub use validation::*;

use crate::model::{Address, CartLine, Channel, CheckoutDetails, Product};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentSource {
    /// Built from the customer's persisted cart, which is cleared after the commit.
    Cart,
    /// A single line bought directly from the product page. The cart is left alone.
    BuyNow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub source: IntentSource,
    pub channel: Channel,
    pub lines: Vec<CartLine>,
    pub checkout: CheckoutDetails,
    /// Defaults to the billing address from the checkout form.
    pub shipping_address: Option<Address>,
    /// The grand total the customer was shown, if the client sent one.
    pub quoted_total: Option<Decimal>,
}

impl OrderIntent {
    /// `lines` are what the client displayed. The commit path prices and stores the
    /// customer's persisted cart instead.
    pub fn from_cart(lines: Vec<CartLine>, channel: Channel, checkout: CheckoutDetails) -> Self {
        Self {
            source: IntentSource::Cart,
            channel,
            lines,
            checkout,
            shipping_address: None,
            quoted_total: None,
        }
    }

    pub fn buy_now(line: CartLine, channel: Channel, checkout: CheckoutDetails) -> Self {
        Self {
            source: IntentSource::BuyNow,
            lines: vec![line],
            ..Self::from_cart(Vec::new(), channel, checkout)
        }
    }

    pub fn with_shipping_address(mut self, address: Address) -> Self {
        self.shipping_address = Some(address);
        self
    }

    pub fn with_quoted_total(mut self, total: Decimal) -> Self {
        self.quoted_total = Some(total);
        self
    }

    pub fn shipping_address(&self) -> Address {
        self.shipping_address
            .clone()
            .unwrap_or_else(|| self.checkout.billing_address())
    }
}

/// A cart line for `product` at its current sale price.
pub fn line_for(product: &Product, color: &str, size: &str, quantity: u32) -> CartLine {
    CartLine {
        product_id: product.product_id.clone(),
        name: product.name.clone(),
        image: String::new(),
        selected_color: color.to_string(),
        selected_size: size.to_string(),
        quantity,
        unit_price: product.sale_price,
        customization: None,
    }
}
