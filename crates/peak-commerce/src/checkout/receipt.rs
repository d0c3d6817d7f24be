//! Receipt types.

use crate::checkout::PaymentMethod;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The immutable output record of a completed checkout.
///
/// Ephemeral: produced once per settlement, handed to the caller, and
/// never persisted. Line prices are the catalog prices at the moment of
/// settlement, not whatever the cart lines captured at add time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receipt {
    /// Settled lines in the order they were processed.
    pub lines: Vec<ReceiptLine>,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Tax charged on the subtotal.
    pub tax: Money,
    /// Flat shipping fee.
    pub shipping_fee: Money,
    /// subtotal + tax + shipping_fee.
    pub total: Money,
    /// Where the order ships.
    pub shipping_address: String,
    /// How the order was paid.
    pub payment_method: PaymentMethod,
    /// Unix timestamp of settlement.
    pub issued_at: i64,
}

impl Receipt {
    /// Total item count across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Get the settled line for a product, if present.
    pub fn line(&self, product_id: &ProductId) -> Option<&ReceiptLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }
}

/// A settled line on a receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptLine {
    /// The product purchased.
    pub product_id: ProductId,
    /// Product name at settlement.
    pub name: String,
    /// Quantity purchased.
    pub quantity: i64,
    /// Unit price at settlement.
    pub unit_price: Money,
    /// unit_price * quantity.
    pub line_total: Money,
}
