// ============================================================================
// Matching Algorithm Interface
// Contract for algorithms that trade an aggressor against the book
// ============================================================================

use crate::domain::{BookSide, Side, Trade, TradeIdSequencer};
use crate::numeric::{Price, Quantity};

/// The incoming order while it is being matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggressor {
    pub order_id: String,
    pub side: Side,
    pub limit_price: Price,
    /// Decremented by every trade; what is left rests on the aggressor's side
    pub remaining: Quantity,
    /// Insertion sequence assigned by the engine
    pub timestamp: u64,
}

impl Aggressor {
    pub fn is_filled(&self) -> bool {
        self.remaining.is_zero()
    }
}

pub trait MatchingAlgorithm: Send + Sync {
    /// Match an aggressor against the opposite side of the book.
    ///
    /// # Arguments
    /// * `aggressor` - The incoming order; `remaining` is reduced in place
    /// * `opposite_side` - The resting side the aggressor trades against
    /// * `trade_ids` - The engine's trade id sequencer
    ///
    /// # Returns
    /// Trades in execution order
    fn match_order(
        &self,
        aggressor: &mut Aggressor,
        opposite_side: &mut BookSide,
        trade_ids: &mut TradeIdSequencer,
    ) -> Vec<Trade>;

    /// Algorithm name for logging
    fn name(&self) -> &str;

    /// Whether an aggressor at `limit_price` may trade with a resting order
    /// at `book_price`
    fn prices_cross(&self, side: Side, limit_price: Price, book_price: Price) -> bool {
        match side {
            Side::Buy => limit_price >= book_price,
            Side::Sell => limit_price <= book_price,
        }
    }
}
