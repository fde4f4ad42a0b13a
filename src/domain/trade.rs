// ============================================================================
// Trade Domain Model
// ============================================================================

use crate::numeric::{Price, Quantity};
use std::fmt;

use super::Side;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sequential trade identifier, rendered as `T<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TradeId(u64);

impl TradeId {
    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

#[cfg(feature = "serde")]
impl Serialize for TradeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TradeId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.strip_prefix('T')
            .and_then(|n| n.parse().ok())
            .map(TradeId)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid trade id: {text}")))
    }
}

/// Hands out trade ids for one engine: 1, 2, 3, ... one per trade.
#[derive(Debug, Clone)]
pub struct TradeIdSequencer {
    next: u64,
}

impl TradeIdSequencer {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> TradeId {
        let id = TradeId(self.next);
        self.next += 1;
        id
    }

    /// Id the next trade will receive
    pub fn peek(&self) -> TradeId {
        TradeId(self.next)
    }
}

impl Default for TradeIdSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// A matched execution between an aggressor and a resting order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    pub trade_id: TradeId,

    pub buy_order_id: String,

    pub sell_order_id: String,

    /// Executed amount
    pub amount: Quantity,

    /// Execution price, always the resting order's limit price
    pub price: Price,

    /// Insertion sequence of the aggressor order that produced the trade
    pub timestamp: u64,

    /// Side of the incoming order; the other side was resting
    pub taker_side: Side,
}

impl Trade {
    pub fn new(
        trade_id: TradeId,
        taker_side: Side,
        taker_order_id: &str,
        maker_order_id: &str,
        price: Price,
        amount: Quantity,
        timestamp: u64,
    ) -> Self {
        let (buy_order_id, sell_order_id) = match taker_side {
            Side::Buy => (taker_order_id, maker_order_id),
            Side::Sell => (maker_order_id, taker_order_id),
        };

        Self {
            trade_id,
            buy_order_id: buy_order_id.to_string(),
            sell_order_id: sell_order_id.to_string(),
            amount,
            price,
            timestamp,
            taker_side,
        }
    }

    pub fn maker_order_id(&self) -> &str {
        match self.taker_side {
            Side::Buy => &self.sell_order_id,
            Side::Sell => &self.buy_order_id,
        }
    }

    pub fn taker_order_id(&self) -> &str {
        match self.taker_side {
            Side::Buy => &self.buy_order_id,
            Side::Sell => &self.sell_order_id,
        }
    }
}
