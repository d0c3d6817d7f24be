//! Commerce error types.

use crate::ids::ProductId;
use crate::money::Money;
use thiserror::Error;

/// Coarse classification of a rejected operation.
///
/// Every recoverable error maps to exactly one kind, so callers can
/// distinguish malformed input from a violated business rule, a missing
/// entity, or corrupted internal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input itself is malformed (bad quantity, bad format).
    Validation,
    /// The input is well-formed but a business rule rejects it.
    Precondition,
    /// A referenced entity does not exist.
    NotFound,
    /// Internal state is corrupt; signals a defect, not a user mistake.
    Integrity,
}

/// Errors that can occur in commerce operations.
///
/// All variants are checked and returned before any mutation takes place.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Invalid quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Insufficient stock.
    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Cart has no lines to settle.
    #[error("cart is empty")]
    EmptyCart,

    /// Shipping address missing or blank.
    #[error("shipping address is required")]
    MissingShippingAddress,

    /// Payment method string is not one of the supported methods.
    #[error("unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),

    /// Arithmetic overflow.
    #[error("arithmetic overflow in money calculation")]
    Overflow,
}

impl CommerceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::ProductNotFound(_) => ErrorKind::NotFound,
            CommerceError::InvalidQuantity(_) | CommerceError::QuantityExceedsLimit(_, _) => {
                ErrorKind::Validation
            }
            CommerceError::InsufficientStock { .. }
            | CommerceError::EmptyCart
            | CommerceError::MissingShippingAddress
            | CommerceError::UnsupportedPaymentMethod(_) => ErrorKind::Precondition,
            CommerceError::Overflow => ErrorKind::Integrity,
        }
    }
}

/// A post-mutation invariant violation.
///
/// These conditions cannot occur under correct precondition checking.
/// Public operations never return them; they are surfaced as a fatal
/// abort, since the state they describe cannot be repaired in place.
#[derive(Error, Debug)]
pub enum IntegrityFault {
    /// A cart line holds a non-positive quantity.
    #[error("cart line for {product_id} has non-positive quantity {quantity}")]
    NonPositiveQuantity { product_id: ProductId, quantity: i64 },

    /// Two cart lines reference the same product.
    #[error("duplicate cart line for {0}")]
    DuplicateLine(ProductId),

    /// A cart line references a product the catalog does not know.
    #[error("cart references unknown product {0}")]
    UnknownProduct(ProductId),

    /// A cached line total disagrees with unit price times quantity.
    #[error("line total mismatch for {product_id}: cached {cached}, computed {computed}")]
    LineTotalMismatch {
        product_id: ProductId,
        cached: Money,
        computed: Money,
    },

    /// Cart totals overflowed during verification.
    #[error("arithmetic overflow while checking cart totals")]
    TotalsOverflow,

    /// The two subtotal derivations disagree.
    #[error("cart subtotal mismatch: cached {cached}, computed {computed}")]
    SubtotalMismatch { cached: Money, computed: Money },

    /// Stock moved outside the allowed range during settlement.
    #[error("stock overdraft for {product_id}: {before} -> {after}")]
    StockOverdraft {
        product_id: ProductId,
        before: i64,
        after: i64,
    },

    /// Cart still holds lines after the clearing step.
    #[error("cart not cleared after settlement: {remaining} line(s) left")]
    CartNotCleared { remaining: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CommerceError::InsufficientStock {
            product_id: ProductId::new("p-2"),
            requested: 10,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for p-2: requested 10, available 5"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CommerceError::InvalidQuantity(0).kind(),
            ErrorKind::Validation
        );
        assert_eq!(CommerceError::EmptyCart.kind(), ErrorKind::Precondition);
        assert_eq!(
            CommerceError::ProductNotFound(ProductId::new("p-9")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(CommerceError::Overflow.kind(), ErrorKind::Integrity);
    }
}
