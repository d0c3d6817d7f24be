//! Product types.

use crate::catalog::StockLevel;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// The catalog is the single source of truth for both `price` and
/// `stock`; cart lines may carry snapshots of either, but settlement
/// always reads the live values from here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price. Never negative.
    pub price: Money,
    /// Live stock level.
    pub stock: StockLevel,
}

impl Product {
    /// Create a new product with an initial stock level.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        initial_stock: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock: StockLevel::new(initial_stock),
        }
    }

    /// Check if the product has any stock on hand.
    pub fn is_in_stock(&self) -> bool {
        self.stock.is_available()
    }
}
