use crate::model::CartLine;

/// Edits to a persisted cart. Indexes refer to the cart's current line order.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Adds a line, merging it into an identical line if one exists.
    Add(CartLine),
    SetQuantity { index: usize, quantity: u32 },
    Remove { index: usize },
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartActionResult {
    Added { index: usize, quantity: u32 },
    QuantitySet { index: usize, quantity: u32 },
    Removed(CartLine),
    Cleared { removed: usize },
}
