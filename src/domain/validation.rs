// ============================================================================
// Validation Errors
// Why an order request was refused before it could touch the book
// ============================================================================

use std::fmt;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidationErrorKind {
    /// `order_id` missing or empty
    MissingOrderId,
    /// `account_id` missing or empty
    MissingAccountId,
    /// `type_op` is neither CREATE nor DELETE
    InvalidOperation,
    /// `side` is neither BUY nor SELL
    InvalidSide,
    /// `pair` is not the instrument this book trades
    InvalidPair,
    /// `amount` is not a decimal number, or is not positive
    InvalidAmount,
    /// `limit_price` is not a decimal number, or is not positive
    InvalidPrice,
    /// A CREATE reuses the id of an order still resting on its side
    DuplicateOrderId,
}

impl ValidationErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ValidationErrorKind::MissingOrderId => "InvalidOrderId",
            ValidationErrorKind::MissingAccountId => "InvalidAccountId",
            ValidationErrorKind::InvalidOperation => "InvalidOrderType",
            ValidationErrorKind::InvalidSide => "InvalidOrderSide",
            ValidationErrorKind::InvalidPair => "InvalidTradingPair",
            ValidationErrorKind::InvalidAmount => "InvalidAmount",
            ValidationErrorKind::InvalidPrice => "InvalidPrice",
            ValidationErrorKind::DuplicateOrderId => "DuplicateOrderId",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A refused order request: which order, which rule, and the offending text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[error("order {order_id:?} rejected ({kind}): {detail}")]
pub struct ValidationError {
    pub order_id: String,
    pub kind: ValidationErrorKind,
    pub detail: String,
}

impl ValidationError {
    pub fn new(
        order_id: impl Into<String>,
        kind: ValidationErrorKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            kind,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::new(
            "42",
            ValidationErrorKind::InvalidAmount,
            "invalid amount: -0.0023",
        );
        assert_eq!(
            err.to_string(),
            "order \"42\" rejected (InvalidAmount): invalid amount: -0.0023"
        );
    }
}
