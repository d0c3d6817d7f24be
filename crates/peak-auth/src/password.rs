//! Password digest computation.
//!
//! Credentials are stored as one-way SHA-256 digests, hex encoded.
//! The digest is unsalted and deterministic: the same password always
//! produces the same 64-character digest, and the stored value never
//! equals the plaintext.

use crate::AuthError;
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Compute the digest for a password.
pub fn digest_password(password: &str) -> String {
    let bytes = Sha256::digest(password.as_bytes());
    hex_encode(&bytes)
}

/// Verify a password against a stored digest.
///
/// Uses a constant-time comparison to avoid leaking how many digest
/// characters matched.
pub fn verify_password(password: &str, digest: &str) -> bool {
    constant_time_eq(digest_password(password).as_bytes(), digest.as_bytes())
}

/// Check that a stored value looks like a digest this module produced.
pub fn is_valid_digest(digest: &str) -> bool {
    digest.len() == DIGEST_HEX_LEN && digest.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate password strength.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Encode bytes as lowercase hex.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let a = digest_password("Password123");
        let b = digest_password("Password123");
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_shape() {
        let digest = digest_password("securepassword");
        assert_eq!(digest.len(), DIGEST_HEX_LEN);
        assert!(is_valid_digest(&digest));
        assert_ne!(digest, "securepassword");
    }

    #[test]
    fn test_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            digest_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_verify() {
        let digest = digest_password("Password123");
        assert!(verify_password("Password123", &digest));
        assert!(!verify_password("password123", &digest));
        assert!(!verify_password("", &digest));
    }

    #[test]
    fn test_distinct_passwords_distinct_digests() {
        assert_ne!(digest_password("Password123"), digest_password("Password124"));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("exactly8").is_ok());
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword { .. })
        ));
        assert!(matches!(
            validate_password(""),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_is_valid_digest_rejects_malformed() {
        assert!(!is_valid_digest("abc"));
        assert!(!is_valid_digest(&"g".repeat(DIGEST_HEX_LEN)));
        assert!(is_valid_digest(&"a".repeat(DIGEST_HEX_LEN)));
    }
}
