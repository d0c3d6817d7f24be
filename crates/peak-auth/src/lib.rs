//! Account registry for PeakCommerce.
//!
//! Provides credential storage with one-way password digests and the
//! authenticated-session flag that gates cart and checkout operations.

mod account;
mod error;
mod password;

pub use account::{Account, AccountStore};
pub use error::{AuthError, IntegrityFault};
pub use password::{
    digest_password, is_valid_digest, validate_password, verify_password, DIGEST_HEX_LEN,
    MIN_PASSWORD_LEN,
};
