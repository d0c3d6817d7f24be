//! Stock tracking types.

use serde::{Deserialize, Serialize};

/// Live stock level for a product.
///
/// Stock is never reserved when an item enters a cart; it only moves at
/// settlement time. Callers re-validate sufficiency at checkout because
/// the level may have changed since the item was added.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StockLevel {
    /// Units currently on hand. Never negative.
    pub quantity: i64,
}

impl StockLevel {
    /// Create a new stock level. Negative inputs are clamped to zero.
    pub fn new(quantity: i64) -> Self {
        Self {
            quantity: quantity.max(0),
        }
    }

    /// Check if any units are on hand.
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Check if a specific quantity can be fulfilled right now.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity > 0 && self.quantity >= quantity
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }

    /// Remove units from stock.
    ///
    /// Refuses to overdraw: returns `false` and leaves the level
    /// unchanged when the requested quantity exceeds what is on hand.
    pub fn deduct(&mut self, quantity: i64) -> bool {
        if !self.can_fulfill(quantity) {
            return false;
        }
        self.quantity -= quantity;
        true
    }

    /// Add units to stock.
    pub fn restock(&mut self, quantity: i64) {
        self.quantity += quantity.max(0);
    }
}
