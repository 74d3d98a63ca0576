//! Custom actions for the Product actor.
//!
//! Every stock movement is one of these actions, so it runs inside the product actor's
//! turn: the availability check and the write it guards cannot be split by another
//! buyer. See [`impl ActorEntity for Product`](crate::model::Product) for the handler.

use crate::model::VariantKey;

/// Stock operations on a single product.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Takes units out of stock.
    ///
    /// # Errors
    /// Fails with `InsufficientStock` when fewer units are on hand, and with
    /// `InvalidQuantity` for zero.
    Reserve { variant: VariantKey, quantity: u32 },
    /// Puts units back or receives new ones. No upper bound beyond `u32`.
    Restock { variant: VariantKey, quantity: u32 },
    /// Admin correction: replaces the count instead of adjusting it.
    SetQuantity { variant: VariantKey, quantity: u32 },
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    Reserved {
        variant: VariantKey,
        quantity: u32,
        remaining: u32,
    },
    Restocked {
        variant: VariantKey,
        quantity: u32,
        now: u32,
    },
    QuantitySet {
        variant: VariantKey,
        previous: u32,
        now: u32,
    },
}

/// One line of a multi-product reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveLine {
    pub product_id: String,
    pub variant: VariantKey,
    pub quantity: u32,
}
