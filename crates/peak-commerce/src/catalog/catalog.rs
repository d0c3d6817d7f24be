//! The product registry.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use std::collections::HashMap;

/// Authoritative registry of products and their live price and stock.
///
/// Products are seeded at construction and never removed. Stock is
/// mutated exclusively by the settlement path; everything else reads.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<ProductId, Product>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            products: HashMap::new(),
        }
    }

    /// Create a catalog seeded with products.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Add a product to the registry. Bootstrap interface; replaces any
    /// existing product with the same ID.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    /// Look up a product, failing if it does not exist.
    pub fn lookup(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.products
            .get(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.clone()))
    }

    /// Look up a product.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// Check whether a product exists.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.contains_key(id)
    }

    /// Number of products in the registry.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over all products.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Remove units from a product's stock.
    ///
    /// Crate-private: only the settlement path may move stock.
    pub(crate) fn deduct_stock(
        &mut self,
        id: &ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.clone()))?;

        if !product.stock.deduct(quantity) {
            return Err(CommerceError::InsufficientStock {
                product_id: id.clone(),
                requested: quantity,
                available: product.stock.quantity,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn sample_catalog() -> Catalog {
        Catalog::with_products([
            Product::new("p-1", "Dumbbell", Money::from_decimal(50.00), 10),
            Product::new("p-2", "Yoga Mat", Money::from_decimal(30.00), 5),
        ])
    }

    #[test]
    fn test_lookup() {
        let catalog = sample_catalog();
        let product = catalog.lookup(&ProductId::new("p-1")).unwrap();
        assert_eq!(product.name, "Dumbbell");

        let err = catalog.lookup(&ProductId::new("p-404")).unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotFound(_)));
    }

    #[test]
    fn test_deduct_stock() {
        let mut catalog = sample_catalog();
        let id = ProductId::new("p-2");

        catalog.deduct_stock(&id, 3).unwrap();
        assert_eq!(catalog.lookup(&id).unwrap().stock.quantity, 2);

        let err = catalog.deduct_stock(&id, 3).unwrap_err();
        assert!(matches!(err, CommerceError::InsufficientStock { .. }));
        // Refused deduction leaves stock untouched
        assert_eq!(catalog.lookup(&id).unwrap().stock.quantity, 2);
    }

    #[test]
    fn test_deduct_stock_unknown_product() {
        let mut catalog = sample_catalog();
        let err = catalog.deduct_stock(&ProductId::new("p-404"), 1).unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotFound(_)));
    }

    #[test]
    fn test_len_and_iteration() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.products().count(), 2);
    }
}
