//! Commerce domain types and logic for PeakCommerce.
//!
//! This crate provides the transaction core of the storefront:
//!
//! - **Catalog**: the product registry, single source of truth for
//!   price and live stock
//! - **Cart**: per-user line items with merge-on-add semantics
//! - **Checkout**: the settlement engine converting a cart into a
//!   priced receipt while decrementing stock
//!
//! # Example
//!
//! ```rust
//! use peak_commerce::prelude::*;
//!
//! let mut catalog = Catalog::with_products([
//!     Product::new("p-1", "Dumbbell", Money::from_decimal(50.00), 10),
//! ]);
//!
//! let mut cart = Cart::new(UserId::new("u-1"));
//! cart.add_line(ProductId::new("p-1"), "Dumbbell", Money::from_decimal(50.00), 2)
//!     .unwrap();
//!
//! let receipt = CheckoutEngine::new()
//!     .settle(&mut cart, &mut catalog, "123 Fitness Street, KL", PaymentMethod::CreditCard)
//!     .unwrap();
//! assert_eq!(receipt.total.display(), "116.00"); // 100.00 + 6% tax + 10.00 shipping
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ids;
pub mod money;

pub use error::{CommerceError, ErrorKind, IntegrityFault};
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ErrorKind, IntegrityFault};
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{Catalog, Product, StockLevel};

    // Cart
    pub use crate::cart::{Cart, CartLine, MAX_QUANTITY_PER_LINE};

    // Checkout
    pub use crate::checkout::{
        CheckoutEngine, CheckoutStage, PaymentMethod, Receipt, ReceiptLine, SettlementConfig,
    };
}
