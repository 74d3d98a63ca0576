use crate::model::{Address, CartLine, Customization, OrderStatus, VariantKey};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the checkout happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    /// Storefront checkout: the order is tracked and a confirmation is sent.
    Online,
    /// Counter sale: the goods leave with the customer.
    Shop,
}

impl Channel {
    pub fn initial_status(self) -> OrderStatus {
        match self {
            Channel::Online => OrderStatus::Placed,
            Channel::Shop => OrderStatus::Delivered,
        }
    }
}

/// The checkout form, stored on the order as `checkout`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub fullname: String,
    pub email: String,
    pub contact: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    #[serde(rename = "paymentID")]
    pub payment_id: String,
    pub date: String,
}

impl CheckoutDetails {
    pub fn billing_address(&self) -> Address {
        Address {
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            contact: self.contact.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
            country: self.country.clone(),
        }
    }
}

/// A frozen copy of a cart line, stored on the order as an element of `cart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub color: String,
    pub size: String,
    pub image: String,
    pub subtotal: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

impl OrderLine {
    pub fn from_cart_line(line: &CartLine, variant: &VariantKey, subtotal: Decimal) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            price: line.unit_price,
            quantity: line.quantity,
            color: variant.color().to_string(),
            size: variant.size().to_string(),
            image: line.image.clone(),
            subtotal,
            customization: line.customization.clone(),
        }
    }

    pub fn variant(&self) -> Option<VariantKey> {
        VariantKey::new(&self.color, &self.size).ok()
    }

    pub fn is_custom(&self) -> bool {
        self.customization.is_some() || self.name.to_lowercase().contains("custom")
    }
}

/// A committed order.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](collection_actor::ActorEntity) trait.
/// Creating one reserves its stock and links it to the customer; see
/// [`order_actor`](crate::order_actor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "orderID")]
    pub order_id: String,
    pub customer_id: String,
    pub channel: Channel,
    pub checkout: CheckoutDetails,
    #[serde(rename = "cart")]
    pub lines: Vec<OrderLine>,
    pub shipping_address: Address,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn payment_reference(&self) -> &str {
        &self.checkout.payment_id
    }

    pub fn billing_address(&self) -> Address {
        self.checkout.billing_address()
    }

    /// The stored document.
    pub fn to_record(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Everything an order needs except its id, which the order collection assigns.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: String,
    pub channel: Channel,
    pub checkout: CheckoutDetails,
    pub lines: Vec<OrderLine>,
    pub shipping_address: Address,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
}

impl OrderDraft {
    pub fn is_custom(&self) -> bool {
        self.lines.iter().any(OrderLine::is_custom)
    }
}

/// Payload for creating an order: the draft plus the id scheme to number it with.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub draft: OrderDraft,
    pub prefix: String,
    pub id_width: usize,
}
