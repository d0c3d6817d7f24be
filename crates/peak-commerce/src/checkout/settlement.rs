//! Checkout settlement.
//!
//! Converts a cart into a priced receipt while decrementing catalog
//! stock and clearing the cart. A settlement runs as one synchronous
//! pass through the stages `Validating -> Settling -> Clearing ->
//! Completed`; any precondition failure exits from `Validating` with
//! zero side effects, and there is no intermediate persisted state,
//! resumption, or retry.

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::checkout::{PaymentMethod, Receipt, ReceiptLine};
use crate::error::{CommerceError, IntegrityFault};
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Stages of a settlement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutStage {
    /// Preconditions are being checked; nothing has been mutated.
    Validating,
    /// Lines are being priced and stock decremented.
    Settling,
    /// The cart is being emptied.
    Clearing,
    /// The receipt has been produced.
    Completed,
}

impl CheckoutStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStage::Validating => "validating",
            CheckoutStage::Settling => "settling",
            CheckoutStage::Clearing => "clearing",
            CheckoutStage::Completed => "completed",
        }
    }
}

impl std::fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Tax rate applied to the subtotal, in percent.
    pub tax_rate_percent: f64,
    /// Flat fee added to every order.
    pub shipping_fee: Money,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            tax_rate_percent: 6.0,
            shipping_fee: Money::from_cents(1000),
        }
    }
}

/// The checkout engine.
///
/// Holds no state of its own; it operates on a cart and a catalog
/// passed in by the caller. Callers are responsible for serializing
/// concurrent settlements over the same catalog (see the storefront
/// crate), so that validation and decrement are observed as one step.
#[derive(Debug, Clone, Default)]
pub struct CheckoutEngine {
    config: SettlementConfig,
}

impl CheckoutEngine {
    /// Create an engine with the default tax rate and shipping fee.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom settlement parameters.
    pub fn with_config(config: SettlementConfig) -> Self {
        Self { config }
    }

    /// The engine's settlement parameters.
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Settle a cart against the catalog.
    ///
    /// On success the catalog stock for every cart line has been
    /// decremented, the cart is empty, and the returned receipt carries
    /// the full pricing breakdown. On error nothing has been mutated.
    ///
    /// Sufficiency is checked per line immediately before each
    /// decrement, never verified in bulk after the fact: there is no
    /// rollback once stock has moved.
    pub fn settle(
        &self,
        cart: &mut Cart,
        catalog: &mut Catalog,
        shipping_address: &str,
        payment_method: PaymentMethod,
    ) -> Result<Receipt, CommerceError> {
        // -- Validating --------------------------------------------------
        let shipping_address = shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(CommerceError::MissingShippingAddress);
        }
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let mut pre_stock: Vec<(ProductId, i64)> = Vec::with_capacity(cart.lines.len());
        for line in &cart.lines {
            let product = catalog.lookup(&line.product_id)?;
            if !product.stock.can_fulfill(line.quantity) {
                return Err(CommerceError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    requested: line.quantity,
                    available: product.stock.quantity,
                });
            }
            pre_stock.push((line.product_id.clone(), product.stock.quantity));
        }

        // -- Settling ----------------------------------------------------
        let mut lines: Vec<ReceiptLine> = Vec::with_capacity(cart.lines.len());
        let mut subtotal = Money::zero();

        for line in &cart.lines {
            let product = catalog.lookup(&line.product_id)?;

            // Re-check sufficiency immediately before the decrement
            if !product.stock.can_fulfill(line.quantity) {
                return Err(CommerceError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    requested: line.quantity,
                    available: product.stock.quantity,
                });
            }

            // Current catalog price, not the add-time snapshot
            let unit_price = product.price;
            let name = product.name.clone();
            let line_total = unit_price
                .try_multiply(line.quantity)
                .ok_or(CommerceError::Overflow)?;
            subtotal = subtotal.try_add(&line_total).ok_or(CommerceError::Overflow)?;

            catalog.deduct_stock(&line.product_id, line.quantity)?;

            lines.push(ReceiptLine {
                product_id: line.product_id.clone(),
                name,
                quantity: line.quantity,
                unit_price,
                line_total,
            });
        }

        let tax = subtotal.percentage(self.config.tax_rate_percent);
        let total = subtotal
            .try_add(&tax)
            .and_then(|t| t.try_add(&self.config.shipping_fee))
            .ok_or(CommerceError::Overflow)?;

        // -- Clearing ----------------------------------------------------
        cart.clear();

        // -- Completed ---------------------------------------------------
        verify_settlement(cart, catalog, &pre_stock);

        Ok(Receipt {
            lines,
            subtotal,
            tax,
            shipping_fee: self.config.shipping_fee,
            total,
            shipping_address: shipping_address.to_string(),
            payment_method,
            issued_at: current_timestamp(),
        })
    }
}

/// Verify the post-settlement state: every touched product ended with
/// `0 <= post <= pre` stock and the cart is empty.
///
/// These conditions cannot fail when the preconditions above held.
/// A violation means stock was already mutated wrongly with no
/// rollback path; aborts instead of returning an error.
fn verify_settlement(cart: &Cart, catalog: &Catalog, pre_stock: &[(ProductId, i64)]) {
    for (product_id, before) in pre_stock {
        let after = match catalog.get(product_id) {
            Some(product) => product.stock.quantity,
            None => {
                let fault = IntegrityFault::UnknownProduct(product_id.clone());
                panic!(
                    "settlement aborted after {} stage: {}",
                    CheckoutStage::Clearing,
                    fault
                );
            }
        };
        if after < 0 || after > *before {
            let fault = IntegrityFault::StockOverdraft {
                product_id: product_id.clone(),
                before: *before,
                after,
            };
            panic!(
                "settlement aborted after {} stage: {}",
                CheckoutStage::Clearing,
                fault
            );
        }
    }

    if !cart.is_empty() {
        let fault = IntegrityFault::CartNotCleared {
            remaining: cart.lines.len(),
        };
        panic!(
            "settlement aborted after {} stage: {}",
            CheckoutStage::Clearing,
            fault
        );
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
