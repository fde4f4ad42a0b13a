// ============================================================================
// Order Domain Model
// Untrusted order requests and their validated forms
// ============================================================================

use crate::numeric::{Price, Quantity};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ();

    /// Exact wire spelling only: `BUY` or `SELL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(()),
        }
    }
}

/// What an order request asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum OperationType {
    /// Match against the book, rest any residual
    Create,
    /// Remove a resting order by id and side
    Delete,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Create => "CREATE",
            OperationType::Delete => "DELETE",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(OperationType::Create),
            "DELETE" => Ok(OperationType::Delete),
            _ => Err(()),
        }
    }
}

// ============================================================================
// Untrusted Order Request
// ============================================================================

/// An order request exactly as received from the outside world.
///
/// Every field is kept as text; nothing here is trusted until it has been
/// through an [`OrderValidator`](crate::interfaces::OrderValidator). Missing
/// fields decode to empty strings so that they are reported by validation
/// instead of failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Order {
    pub type_op: String,
    pub account_id: String,
    pub amount: String,
    pub order_id: String,
    pub pair: String,
    pub limit_price: String,
    pub side: String,
}

impl Order {
    /// Convenience constructor for a CREATE request.
    pub fn create(
        order_id: impl Into<String>,
        account_id: impl Into<String>,
        side: Side,
        amount: impl Into<String>,
        limit_price: impl Into<String>,
        pair: impl Into<String>,
    ) -> Self {
        Self {
            type_op: OperationType::Create.as_str().to_string(),
            account_id: account_id.into(),
            amount: amount.into(),
            order_id: order_id.into(),
            pair: pair.into(),
            limit_price: limit_price.into(),
            side: side.as_str().to_string(),
        }
    }

    /// Convenience constructor for a DELETE request. Amount and price are
    /// still validated, so callers pass the values of the original order.
    pub fn delete(
        order_id: impl Into<String>,
        account_id: impl Into<String>,
        side: Side,
        amount: impl Into<String>,
        limit_price: impl Into<String>,
        pair: impl Into<String>,
    ) -> Self {
        Self {
            type_op: OperationType::Delete.as_str().to_string(),
            ..Self::create(order_id, account_id, side, amount, limit_price, pair)
        }
    }
}

// ============================================================================
// Validated Requests
// ============================================================================

/// A CREATE request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_id: String,
    pub account_id: String,
    pub side: Side,
    pub amount: Quantity,
    pub limit_price: Price,
}

/// A DELETE request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub order_id: String,
    pub account_id: String,
    pub side: Side,
}

/// Output of validation: the only form in which a request reaches the book
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidOrder {
    Create(NewOrder),
    Delete(CancelRequest),
}
