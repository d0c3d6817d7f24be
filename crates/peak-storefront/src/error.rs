//! Storefront error type.

use peak_auth::AuthError;
use peak_commerce::error::{CommerceError, ErrorKind};
use thiserror::Error;

/// Any error a storefront operation can return.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Account or credential failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Catalog, cart, or settlement failure.
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}

impl StorefrontError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorefrontError::Auth(err) => err.kind(),
            StorefrontError::Commerce(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_passes_through() {
        let err: StorefrontError = AuthError::InvalidCredentials.into();
        assert_eq!(err.kind(), ErrorKind::Precondition);

        let err: StorefrontError = CommerceError::EmptyCart.into();
        assert_eq!(err.kind(), ErrorKind::Precondition);

        let err: StorefrontError = CommerceError::InvalidQuantity(-1).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
