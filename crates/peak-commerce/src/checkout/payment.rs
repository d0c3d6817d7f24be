//! Payment method types.

use serde::{Deserialize, Serialize};

/// Supported payment methods.
///
/// A closed set: anything else is rejected at the service boundary
/// before settlement starts. No processor integration happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit card.
    CreditCard,
    /// PayPal.
    Paypal,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credit_card" => Some(PaymentMethod::CreditCard),
            "paypal" => Some(PaymentMethod::Paypal),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Paypal => "PayPal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            PaymentMethod::from_str("credit_card"),
            Some(PaymentMethod::CreditCard)
        );
        assert_eq!(PaymentMethod::from_str("PAYPAL"), Some(PaymentMethod::Paypal));
        assert_eq!(PaymentMethod::from_str("bitcoin"), None);
        assert_eq!(PaymentMethod::from_str(""), None);
    }

    #[test]
    fn test_round_trip() {
        for method in [PaymentMethod::CreditCard, PaymentMethod::Paypal] {
            assert_eq!(PaymentMethod::from_str(method.as_str()), Some(method));
        }
    }
}
