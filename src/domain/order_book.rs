// ============================================================================
// Order Book Domain Model
// ============================================================================

use crate::numeric::{NumericResult, Price, Quantity};
use std::collections::{BTreeMap, HashMap, VecDeque};
use thiserror::Error;

use super::Side;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Resting Entry
// ============================================================================

/// A resting order: what is left of a CREATE after matching
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookEntry {
    pub order_id: String,
    pub account_id: String,
    /// Remaining amount, strictly positive while resting
    pub amount: Quantity,
    pub limit_price: Price,
    pub side: Side,
    /// Engine insertion sequence, used only for ordering
    pub timestamp: u64,
}

/// What happened to the best resting order during one fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakerFill {
    pub order_id: String,
    pub account_id: String,
    pub limit_price: Price,
    pub filled: Quantity,
    pub remaining: Quantity,
}

impl MakerFill {
    pub fn is_complete(&self) -> bool {
        self.remaining.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("order {0} has a non-positive amount and cannot rest")]
    NonPositiveAmount(String),
    #[error("order {order_id} is already resting on the {side} side")]
    DuplicateOrderId { order_id: String, side: Side },
    #[error("order {order_id} is a {actual} order and cannot rest on the {expected} side")]
    WrongSide {
        order_id: String,
        expected: Side,
        actual: Side,
    },
}

// ============================================================================
// Price Level
// ============================================================================

/// FIFO queue of resting orders sharing one limit price
#[derive(Debug, Clone)]
pub struct PriceLevel {
    pub price: Price,
    orders: VecDeque<BookEntry>,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
        }
    }

    fn push_back(&mut self, entry: BookEntry) {
        self.orders.push_back(entry);
    }

    fn remove(&mut self, order_id: &str) -> Option<BookEntry> {
        let position = self.orders.iter().position(|e| e.order_id == order_id)?;
        self.orders.remove(position)
    }

    /// Sum of the resting amounts. Each amount is in range on its own, but
    /// a crowded level can add up past `Quantity::MAX`.
    pub fn total_quantity(&self) -> NumericResult<Quantity> {
        Quantity::checked_sum(self.orders.iter().map(|e| e.amount))
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Entries in time priority
    pub fn iter(&self) -> impl Iterator<Item = &BookEntry> {
        self.orders.iter()
    }

    pub fn front(&self) -> Option<&BookEntry> {
        self.orders.front()
    }
}

// ============================================================================
// Order Book Side
// ============================================================================

/// One side of the book (bids or asks).
///
/// Levels live in a `BTreeMap` keyed by price; bids are read from the high
/// end, asks from the low end. Within a level orders are strictly FIFO, and
/// because insertion sequence only grows, FIFO is timestamp ascending.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
    /// order_id -> price of the level holding it
    index: HashMap<String, Price>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Rest an entry behind every order already at its price.
    pub fn insert(&mut self, entry: BookEntry) -> Result<(), BookError> {
        if entry.side != self.side {
            return Err(BookError::WrongSide {
                order_id: entry.order_id,
                expected: self.side,
                actual: entry.side,
            });
        }
        if !entry.amount.is_positive() {
            return Err(BookError::NonPositiveAmount(entry.order_id));
        }
        if self.index.contains_key(&entry.order_id) {
            return Err(BookError::DuplicateOrderId {
                order_id: entry.order_id,
                side: self.side,
            });
        }

        let price = entry.limit_price;
        self.index.insert(entry.order_id.clone(), price);
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(entry);
        Ok(())
    }

    /// Remove a resting order. `None` means there was nothing to remove.
    pub fn remove(&mut self, order_id: &str) -> Option<BookEntry> {
        let price = self.index.remove(order_id)?;
        let level = self.levels.get_mut(&price)?;
        let entry = level.remove(order_id);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        entry
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.index.contains_key(order_id)
    }

    pub fn get(&self, order_id: &str) -> Option<&BookEntry> {
        let price = self.index.get(order_id)?;
        self.levels
            .get(price)?
            .iter()
            .find(|e| e.order_id == order_id)
    }

    /// Number of resting orders
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn best_level(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values().next_back(),
            Side::Sell => self.levels.values().next(),
        }
    }

    /// Top-of-book price
    pub fn best_price(&self) -> Option<Price> {
        self.best_level().map(|level| level.price)
    }

    /// The order that would trade first
    pub fn best(&self) -> Option<&BookEntry> {
        self.best_level().and_then(PriceLevel::front)
    }

    /// Levels from best to worst price
    pub fn levels(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    /// Every resting entry in full price-time priority
    pub fn iter(&self) -> impl Iterator<Item = &BookEntry> + '_ {
        self.levels().flat_map(|level| level.iter())
    }

    /// Execute `quantity` against the best order. The order is removed as
    /// soon as it reaches zero. `quantity` is clamped to what the order has.
    pub fn fill_best(&mut self, quantity: Quantity) -> Option<MakerFill> {
        if !quantity.is_positive() {
            return None;
        }

        let mut best = match self.side {
            Side::Buy => self.levels.last_entry()?,
            Side::Sell => self.levels.first_entry()?,
        };
        let level = best.get_mut();
        let maker = level.orders.front_mut()?;

        // filled <= maker.amount, so the subtraction never leaves [0, amount]
        let filled = quantity.min(maker.amount);
        maker.amount = maker.amount.saturating_sub(filled);
        let fill = MakerFill {
            order_id: maker.order_id.clone(),
            account_id: maker.account_id.clone(),
            limit_price: maker.limit_price,
            filled,
            remaining: maker.amount,
        };

        if fill.is_complete() {
            level.orders.pop_front();
            if level.is_empty() {
                best.remove();
            }
            self.index.remove(&fill.order_id);
        }

        Some(fill)
    }

    /// Aggregated (price, quantity) for the best `num_levels` levels.
    /// A level whose total does not fit is reported as `Quantity::MAX`.
    pub fn get_depth(&self, num_levels: usize) -> Vec<(Price, Quantity)> {
        self.levels()
            .take(num_levels)
            .map(|level| (level.price, level.total_quantity().unwrap_or(Quantity::MAX)))
            .collect()
    }

    /// Total resting amount on this side
    pub fn total_quantity(&self) -> NumericResult<Quantity> {
        Quantity::checked_sum(self.iter().map(|e| e.amount))
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// Read-only copy of both sides, entries in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub buys: Vec<BookEntry>,
    pub sells: Vec<BookEntry>,
}

impl OrderBookSnapshot {
    pub fn capture(buys: &BookSide, sells: &BookSide) -> Self {
        Self {
            buys: buys.iter().cloned().collect(),
            sells: sells.iter().cloned().collect(),
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.buys.first().map(|e| e.limit_price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.sells.first().map(|e| e.limit_price)
    }

    /// Ask minus bid, when both sides are present
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => ask.checked_sub(bid).ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }
}

/// Aggregated price levels (price, total quantity), best first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarketDepth {
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}
