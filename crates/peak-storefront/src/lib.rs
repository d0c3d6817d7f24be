//! In-process storefront service for PeakCommerce.
//!
//! Composes the catalog, account store, and per-user carts into the
//! four-operation surface of the transaction core: register,
//! authenticate, add to cart, check out. All operations are
//! synchronous; concurrency control is explicit locking, with the
//! checkout's validate-then-decrement sequence serialized per catalog.

mod error;
mod storefront;

pub use error::StorefrontError;
pub use storefront::Storefront;
