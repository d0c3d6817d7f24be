//! Shopping cart module.
//!
//! Contains the cart, its line items, and the invariant checker.

mod cart;

pub use cart::{Cart, CartLine, MAX_QUANTITY_PER_LINE};
