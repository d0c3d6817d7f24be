//! The in-process storefront service.

use crate::error::StorefrontError;
use peak_auth::{Account, AccountStore, AuthError};
use peak_commerce::cart::{Cart, CartLine};
use peak_commerce::catalog::{Catalog, Product};
use peak_commerce::checkout::{CheckoutEngine, PaymentMethod, Receipt};
use peak_commerce::error::CommerceError;
use peak_commerce::ids::{ProductId, UserId};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// The storefront service.
///
/// Composes the catalog, the account store, and the per-user carts
/// behind explicit locks. One instance per process (or per test); all
/// state lives for the duration of the process run.
///
/// Locking discipline: the cart table is always locked before the
/// catalog, and `checkout` holds the catalog write lock across the
/// whole validate-then-decrement sequence, so no two settlements can
/// interleave a decrement between another's validation and mutation.
/// `add_to_cart` only ever reads the catalog; stock is not reserved,
/// which is exactly why checkout re-validates it.
///
/// Lock poisoning is not recovered from: a poisoned lock means a prior
/// operation aborted on an integrity fault mid-mutation.
pub struct Storefront {
    accounts: RwLock<AccountStore>,
    catalog: RwLock<Catalog>,
    carts: Mutex<HashMap<UserId, Cart>>,
    engine: CheckoutEngine,
}

impl Storefront {
    /// Create a storefront over a seeded catalog, with default
    /// settlement parameters.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_engine(catalog, CheckoutEngine::new())
    }

    /// Create a storefront with a custom checkout engine.
    pub fn with_engine(catalog: Catalog, engine: CheckoutEngine) -> Self {
        Self {
            accounts: RwLock::new(AccountStore::new()),
            catalog: RwLock::new(catalog),
            carts: Mutex::new(HashMap::new()),
            engine,
        }
    }

    /// Register a new user.
    pub fn register_user(&self, email: &str, password: &str) -> Result<Account, StorefrontError> {
        let result = self.try_register(email, password);
        match &result {
            Ok(account) => tracing::info!(email = %account.email, "registered user"),
            Err(err) => tracing::warn!(email, error = %err, "registration rejected"),
        }
        result
    }

    fn try_register(&self, email: &str, password: &str) -> Result<Account, StorefrontError> {
        let mut accounts = self.accounts.write().expect("account store lock poisoned");
        let account = accounts.register(email, password)?;
        Ok(account.clone())
    }

    /// Authenticate a user by email and password.
    ///
    /// A success sets the account's session flag and makes sure the
    /// user has an (initially empty) cart: the session has started.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<(), StorefrontError> {
        let result = self.try_authenticate(email, password);
        match &result {
            Ok(()) => tracing::info!(email, "authenticated user"),
            Err(err) => tracing::warn!(email, error = %err, "authentication rejected"),
        }
        result
    }

    fn try_authenticate(&self, email: &str, password: &str) -> Result<(), StorefrontError> {
        let user_id = {
            let mut accounts = self.accounts.write().expect("account store lock poisoned");
            accounts.authenticate(email, password)?.id.clone()
        };

        let mut carts = self.carts.lock().expect("cart table lock poisoned");
        carts
            .entry(user_id.clone())
            .or_insert_with(|| Cart::new(user_id));
        Ok(())
    }

    /// Add a quantity of a product to the user's cart.
    ///
    /// Requires an authenticated session, an existing product, a
    /// positive quantity, and enough stock *right now* (the stock is
    /// not reserved; checkout re-validates it). Catalog stock is never
    /// touched here. Returns the updated line.
    pub fn add_to_cart(
        &self,
        email: &str,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartLine, StorefrontError> {
        let result = self.try_add_to_cart(email, product_id, quantity);
        match &result {
            Ok(line) => tracing::info!(
                email,
                product = %product_id,
                quantity,
                line_quantity = line.quantity,
                "added to cart"
            ),
            Err(err) => tracing::warn!(
                email,
                product = %product_id,
                quantity,
                error = %err,
                "add to cart rejected"
            ),
        }
        result
    }

    fn try_add_to_cart(
        &self,
        email: &str,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartLine, StorefrontError> {
        let user_id = self.authenticated_user_id(email)?;

        // Lock order: carts, then catalog
        let mut carts = self.carts.lock().expect("cart table lock poisoned");
        let catalog = self.catalog.read().expect("catalog lock poisoned");

        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity).into());
        }
        let product = catalog.lookup(product_id)?;
        if !product.stock.can_fulfill(quantity) {
            return Err(CommerceError::InsufficientStock {
                product_id: product_id.clone(),
                requested: quantity,
                available: product.stock.quantity,
            }
            .into());
        }
        let name = product.name.clone();
        let unit_price = product.price;

        let cart = carts
            .entry(user_id.clone())
            .or_insert_with(|| Cart::new(user_id));
        let previous_quantity = cart.line(product_id).map(|l| l.quantity).unwrap_or(0);

        let line = cart
            .add_line(product_id.clone(), name, unit_price, quantity)?
            .clone();

        // From here on the cart has been mutated; a failure is a defect
        // in the cart logic, not a caller mistake, and the cart cannot
        // be trusted afterwards.
        if line.quantity != previous_quantity + quantity {
            tracing::error!(email, product = %product_id, "cart postcondition violated");
            panic!(
                "cart postcondition violated for {}: expected quantity {}, found {}",
                product_id,
                previous_quantity + quantity,
                line.quantity
            );
        }
        if let Err(fault) = cart.check_invariants(&catalog) {
            tracing::error!(email, error = %fault, "cart corrupted after mutation");
            panic!("cart corrupted after mutation: {}", fault);
        }

        Ok(line)
    }

    /// Check out the user's cart.
    ///
    /// Settles every line at the catalog's current prices, decrements
    /// stock, clears the cart, and returns the receipt. Any rejected
    /// precondition leaves every piece of state exactly as it was.
    pub fn checkout(
        &self,
        email: &str,
        shipping_address: &str,
        payment_method: &str,
    ) -> Result<Receipt, StorefrontError> {
        let result = self.try_checkout(email, shipping_address, payment_method);
        match &result {
            Ok(receipt) => tracing::info!(
                email,
                items = receipt.item_count(),
                total_cents = receipt.total.cents,
                "checkout completed"
            ),
            Err(err) => tracing::warn!(email, error = %err, "checkout rejected"),
        }
        result
    }

    fn try_checkout(
        &self,
        email: &str,
        shipping_address: &str,
        payment_method: &str,
    ) -> Result<Receipt, StorefrontError> {
        let user_id = self.authenticated_user_id(email)?;
        let method = PaymentMethod::from_str(payment_method)
            .ok_or_else(|| CommerceError::UnsupportedPaymentMethod(payment_method.to_string()))?;

        // Lock order: carts, then catalog. The catalog write lock is
        // held across validation and decrement (see type docs).
        let mut carts = self.carts.lock().expect("cart table lock poisoned");
        let cart = carts.get_mut(&user_id).ok_or(CommerceError::EmptyCart)?;
        let mut catalog = self.catalog.write().expect("catalog lock poisoned");

        let receipt = self
            .engine
            .settle(cart, &mut catalog, shipping_address, method)?;
        Ok(receipt)
    }

    /// Snapshot of a product, if it exists.
    pub fn product(&self, product_id: &ProductId) -> Option<Product> {
        self.catalog
            .read()
            .expect("catalog lock poisoned")
            .get(product_id)
            .cloned()
    }

    /// Snapshot of a user's cart, if one exists.
    pub fn cart_of(&self, email: &str) -> Option<Cart> {
        let user_id = {
            let accounts = self.accounts.read().expect("account store lock poisoned");
            accounts.get(email)?.id.clone()
        };
        let carts = self.carts.lock().expect("cart table lock poisoned");
        carts.get(&user_id).cloned()
    }

    fn authenticated_user_id(&self, email: &str) -> Result<UserId, AuthError> {
        let accounts = self.accounts.read().expect("account store lock poisoned");
        let account = accounts
            .get(email)
            .ok_or_else(|| AuthError::UserNotFound(email.to_string()))?;
        if !account.is_authenticated() {
            return Err(AuthError::NotAuthenticated(email.to_string()));
        }
        Ok(account.id.clone())
    }
}
