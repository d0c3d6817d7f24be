//! Cart and line item types.

use crate::catalog::Catalog;
use crate::error::{CommerceError, IntegrityFault};
use crate::ids::{CartId, ProductId, UserId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// A shopping cart.
///
/// Owned by exactly one user; created empty when that user's session
/// starts and cleared only by a successful checkout. Lines stay in
/// insertion order, which is also the order settlement processes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// The user who owns this cart.
    pub owner: UserId,
    /// Lines in insertion order, at most one per product.
    pub lines: Vec<CartLine>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create a new empty cart for a user.
    pub fn new(owner: UserId) -> Self {
        let now = current_timestamp();
        Self {
            id: CartId::generate(),
            owner,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a quantity of a product to the cart.
    ///
    /// If the product already has a line, its quantity is incremented
    /// (merge, not replace); otherwise a new line is appended. `name`
    /// and `unit_price` are informational snapshots; settlement prices
    /// lines from the live catalog.
    ///
    /// Returns an error if quantity is not positive, the merged
    /// quantity would exceed [`MAX_QUANTITY_PER_LINE`], or arithmetic
    /// would overflow.
    pub fn add_line(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Result<&CartLine, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        // Merge into an existing line for the same product
        if let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) {
            let line = &mut self.lines[index];
            let new_quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_LINE {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_LINE,
                ));
            }

            line.quantity = new_quantity;
            line.update_total()?;
            self.updated_at = current_timestamp();
            return Ok(&self.lines[index]);
        }

        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_LINE,
            ));
        }

        let line = CartLine::new(product_id, name, unit_price, quantity)?;
        self.lines.push(line);
        self.updated_at = current_timestamp();
        Ok(self.lines.last().expect("line was just pushed"))
    }

    /// Remove a product's line from the cart.
    pub fn remove_line(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        let removed = self.lines.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Set a line's quantity directly.
    ///
    /// A quantity of zero or less removes the line. Returns `true` if a
    /// line was changed or removed.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_line(product_id));
        }

        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_LINE,
            ));
        }

        if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            line.quantity = quantity;
            line.update_total()?;
            self.updated_at = current_timestamp();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Clear all lines from the cart in one step.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.updated_at = current_timestamp();
    }

    /// Get the line for a product, if present.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Number of distinct product lines.
    pub fn unique_line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cart subtotal: the sum of cached line totals.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        Money::try_sum(self.lines.iter().map(|l| &l.line_total)).ok_or(CommerceError::Overflow)
    }

    /// Verify the cart's structural invariants against a catalog.
    ///
    /// Checks that every line has a positive quantity, no product
    /// appears twice, every product resolves in the catalog, and every
    /// cached total agrees with unit price times quantity (both
    /// subtotal derivations must agree). Callers run this after each
    /// mutation; a failure means the preceding mutation corrupted
    /// state and is fatal.
    pub fn check_invariants(&self, catalog: &Catalog) -> Result<(), IntegrityFault> {
        let mut seen: HashSet<&ProductId> = HashSet::new();
        let mut computed_subtotal = Money::zero();

        for line in &self.lines {
            if line.quantity <= 0 {
                return Err(IntegrityFault::NonPositiveQuantity {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                });
            }
            if !seen.insert(&line.product_id) {
                return Err(IntegrityFault::DuplicateLine(line.product_id.clone()));
            }
            if !catalog.contains(&line.product_id) {
                return Err(IntegrityFault::UnknownProduct(line.product_id.clone()));
            }

            let computed = line
                .unit_price
                .try_multiply(line.quantity)
                .ok_or(IntegrityFault::TotalsOverflow)?;
            if computed != line.line_total {
                return Err(IntegrityFault::LineTotalMismatch {
                    product_id: line.product_id.clone(),
                    cached: line.line_total,
                    computed,
                });
            }

            computed_subtotal = computed_subtotal
                .try_add(&computed)
                .ok_or(IntegrityFault::TotalsOverflow)?;
        }

        let cached_subtotal =
            Money::try_sum(self.lines.iter().map(|l| &l.line_total))
                .ok_or(IntegrityFault::TotalsOverflow)?;
        if cached_subtotal != computed_subtotal {
            return Err(IntegrityFault::SubtotalMismatch {
                cached: cached_subtotal,
                computed: computed_subtotal,
            });
        }

        Ok(())
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Product name at add time (informational).
    pub name: String,
    /// Unit price at add time (informational; settlement uses the
    /// catalog's current price).
    pub unit_price: Money,
    /// Quantity. Always positive.
    pub quantity: i64,
    /// Cached unit_price * quantity.
    pub line_total: Money,
}

impl CartLine {
    fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Result<Self, CommerceError> {
        let line_total = unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            line_total,
        })
    }

    /// Re-derive the cached total from quantity.
    fn update_total(&mut self) -> Result<(), CommerceError> {
        self.line_total = self
            .unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn sample_catalog() -> Catalog {
        Catalog::with_products([
            Product::new("p-1", "Dumbbell", Money::from_decimal(50.00), 10),
            Product::new("p-2", "Yoga Mat", Money::from_decimal(30.00), 5),
        ])
    }

    fn cart() -> Cart {
        Cart::new(UserId::new("u-1"))
    }

    #[test]
    fn test_cart_starts_empty() {
        let cart = cart();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_line() {
        let mut cart = cart();
        let line = cart
            .add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), 2)
            .unwrap();

        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total.cents, 10000);
        assert_eq!(cart.unique_line_count(), 1);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = cart();
        let id = ProductId::new("p-1");

        cart.add_line(id.clone(), "Dumbbell", Money::from_cents(5000), 1)
            .unwrap();
        let line = cart
            .add_line(id.clone(), "Dumbbell", Money::from_cents(5000), 2)
            .unwrap();

        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total.cents, 15000);
        assert_eq!(cart.unique_line_count(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = cart();
        for qty in [0, -1] {
            let err = cart
                .add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), qty)
                .unwrap_err();
            assert!(matches!(err, CommerceError::InvalidQuantity(_)));
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_quantity_over_limit() {
        let mut cart = cart();
        let err = cart
            .add_line(
                ProductId::new("p-1"),
                "Dumbbell",
                Money::from_cents(5000),
                MAX_QUANTITY_PER_LINE + 1,
            )
            .unwrap_err();
        assert!(matches!(err, CommerceError::QuantityExceedsLimit(_, _)));
    }

    #[test]
    fn test_merge_rejects_quantity_over_limit() {
        let mut cart = cart();
        let id = ProductId::new("p-1");
        cart.add_line(id.clone(), "Dumbbell", Money::from_cents(5000), MAX_QUANTITY_PER_LINE)
            .unwrap();

        let err = cart
            .add_line(id.clone(), "Dumbbell", Money::from_cents(5000), 1)
            .unwrap_err();
        assert!(matches!(err, CommerceError::QuantityExceedsLimit(_, _)));
        // Existing line untouched
        assert_eq!(cart.line(&id).unwrap().quantity, MAX_QUANTITY_PER_LINE);
    }

    #[test]
    fn test_remove_line() {
        let mut cart = cart();
        let id = ProductId::new("p-1");
        cart.add_line(id.clone(), "Dumbbell", Money::from_cents(5000), 1)
            .unwrap();

        assert!(cart.remove_line(&id));
        assert!(cart.is_empty());
        assert!(!cart.remove_line(&id));
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = cart();
        let id = ProductId::new("p-1");
        cart.add_line(id.clone(), "Dumbbell", Money::from_cents(5000), 1)
            .unwrap();

        assert!(cart.set_quantity(&id, 5).unwrap());
        assert_eq!(cart.line(&id).unwrap().quantity, 5);
        assert_eq!(cart.line(&id).unwrap().line_total.cents, 25000);

        // Zero removes the line
        assert!(cart.set_quantity(&id, 0).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal() {
        let mut cart = cart();
        cart.add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), 2)
            .unwrap();
        cart.add_line(ProductId::new("p-2"), "Yoga Mat", Money::from_cents(3000), 1)
            .unwrap();

        assert_eq!(cart.subtotal().unwrap().cents, 13000);
    }

    #[test]
    fn test_clear() {
        let mut cart = cart();
        cart.add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), 2)
            .unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_invariants_hold_after_mutations() {
        let catalog = sample_catalog();
        let mut cart = cart();
        cart.add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), 2)
            .unwrap();
        cart.add_line(ProductId::new("p-2"), "Yoga Mat", Money::from_cents(3000), 1)
            .unwrap();
        cart.add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), 3)
            .unwrap();

        cart.check_invariants(&catalog).unwrap();
    }

    #[test]
    fn test_invariants_catch_duplicate_lines() {
        let catalog = sample_catalog();
        let mut cart = cart();
        cart.add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), 1)
            .unwrap();
        // Corrupt the cart behind the API's back
        let duplicate = cart.lines[0].clone();
        cart.lines.push(duplicate);

        let fault = cart.check_invariants(&catalog).unwrap_err();
        assert!(matches!(fault, IntegrityFault::DuplicateLine(_)));
    }

    #[test]
    fn test_invariants_catch_unknown_product() {
        let catalog = sample_catalog();
        let mut cart = cart();
        cart.add_line(ProductId::new("p-404"), "Ghost", Money::from_cents(100), 1)
            .unwrap();

        let fault = cart.check_invariants(&catalog).unwrap_err();
        assert!(matches!(fault, IntegrityFault::UnknownProduct(_)));
    }

    #[test]
    fn test_invariants_catch_doctored_totals() {
        let catalog = sample_catalog();
        let mut cart = cart();
        cart.add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), 2)
            .unwrap();
        cart.lines[0].line_total = Money::from_cents(1);

        let fault = cart.check_invariants(&catalog).unwrap_err();
        assert!(matches!(fault, IntegrityFault::LineTotalMismatch { .. }));
    }

    #[test]
    fn test_invariants_catch_non_positive_quantity() {
        let catalog = sample_catalog();
        let mut cart = cart();
        cart.add_line(ProductId::new("p-1"), "Dumbbell", Money::from_cents(5000), 2)
            .unwrap();
        cart.lines[0].quantity = 0;

        let fault = cart.check_invariants(&catalog).unwrap_err();
        assert!(matches!(fault, IntegrityFault::NonPositiveQuantity { .. }));
    }
}
