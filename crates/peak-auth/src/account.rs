//! Account records and the account store.

use crate::error::IntegrityFault;
use crate::password::{self, DIGEST_HEX_LEN};
use crate::AuthError;
use peak_commerce::ids::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A registered account.
///
/// Immutable after registration apart from the session flag: there is
/// no credential update or deletion, and no token or expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address (the lookup key).
    pub email: String,
    /// One-way hex digest of the password.
    pub password_digest: String,
    /// Whether a credential check has succeeded this session.
    pub authenticated: bool,
    /// Unix timestamp of registration.
    pub created_at: i64,
}

impl Account {
    fn new(email: impl Into<String>, password_digest: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            password_digest: password_digest.into(),
            authenticated: false,
            created_at: current_timestamp(),
        }
    }

    /// Check if this account holds an authenticated session.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// Credential records keyed by email.
///
/// Constructed once per process (or per test) and passed by handle;
/// there is no process-wide singleton.
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: HashMap<String, Account>,
}

impl AccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Register a new account.
    ///
    /// Validates the email and password before touching the store:
    /// both must be non-empty, the email must contain `'@'`, the
    /// password must be at least eight characters, and the email must
    /// not already be registered. Nothing is mutated on rejection.
    pub fn register(&mut self, email: &str, password: &str) -> Result<&Account, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }
        password::validate_password(password)?;
        if self.accounts.contains_key(email) {
            return Err(AuthError::EmailTaken(email.to_string()));
        }

        let digest = password::digest_password(password);
        self.accounts
            .insert(email.to_string(), Account::new(email, digest));

        // The record must be retrievable, and the whole store must
        // still be well-formed. A failure here is a defect in this
        // module, not a caller mistake, and the store cannot be
        // trusted afterwards.
        if !self.accounts.contains_key(email) {
            let fault = IntegrityFault::MissingRecord(email.to_string());
            panic!("account store corrupted after registration: {}", fault);
        }
        if let Err(fault) = self.check_invariants() {
            panic!("account store corrupted after registration: {}", fault);
        }

        Ok(&self.accounts[email])
    }

    /// Authenticate an account by email and password.
    ///
    /// On a digest match the account's session flag is set. Fails with
    /// `UserNotFound` for an unknown email and `InvalidCredentials`
    /// for a wrong password; neither failure mutates anything.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<&Account, AuthError> {
        let account = self
            .accounts
            .get_mut(email)
            .ok_or_else(|| AuthError::UserNotFound(email.to_string()))?;

        if !password::verify_password(password, &account.password_digest) {
            return Err(AuthError::InvalidCredentials);
        }

        account.authenticated = true;
        Ok(account)
    }

    /// Look up an account by email.
    pub fn get(&self, email: &str) -> Option<&Account> {
        self.accounts.get(email)
    }

    /// Check whether an email holds an authenticated session.
    pub fn is_authenticated(&self, email: &str) -> bool {
        self.accounts
            .get(email)
            .map(|a| a.is_authenticated())
            .unwrap_or(false)
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if the store has no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Verify the store's structural invariants: every digest is a
    /// fixed-length hex digest and every record is filed under its own
    /// email (emails are pairwise distinct by construction of the map,
    /// so a misfiled record is the only way duplication can sneak in).
    fn check_invariants(&self) -> Result<(), IntegrityFault> {
        for (key, account) in &self.accounts {
            if !password::is_valid_digest(&account.password_digest) {
                return Err(IntegrityFault::MalformedDigest {
                    email: account.email.clone(),
                    expected_len: DIGEST_HEX_LEN,
                });
            }
            if key != &account.email {
                return Err(IntegrityFault::MisfiledRecord {
                    email: account.email.clone(),
                    key: key.clone(),
                });
            }
        }
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
