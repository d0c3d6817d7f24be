//! Authentication errors.

use peak_commerce::error::ErrorKind;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email or password missing entirely.
    #[error("email and password are required")]
    MissingCredentials,

    /// Email is not in a valid format.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Password does not meet the minimum length.
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Email already registered.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// No account for the given email.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Credentials did not match the stored digest.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Operation requires an authenticated session.
    #[error("user is not authenticated: {0}")]
    NotAuthenticated(String),
}

impl AuthError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidEmail(_)
            | AuthError::WeakPassword { .. }
            | AuthError::EmailTaken(_) => ErrorKind::Validation,
            AuthError::UserNotFound(_) => ErrorKind::NotFound,
            AuthError::InvalidCredentials | AuthError::NotAuthenticated(_) => {
                ErrorKind::Precondition
            }
        }
    }
}

/// A post-mutation invariant violation in the account store.
///
/// Cannot occur under correct precondition checking; surfaced as a
/// fatal abort, never as a recoverable error.
#[derive(Error, Debug)]
pub enum IntegrityFault {
    /// A stored digest is not a well-formed fixed-length hex digest.
    #[error("stored digest for {email} is not a {expected_len}-char hex digest")]
    MalformedDigest { email: String, expected_len: usize },

    /// A record is filed under a key that disagrees with its email.
    #[error("account record for {email} filed under key {key}")]
    MisfiledRecord { email: String, key: String },

    /// A record that was just inserted cannot be found.
    #[error("account for {0} missing after registration")]
    MissingRecord(String),
}
