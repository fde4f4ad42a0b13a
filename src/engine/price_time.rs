// ============================================================================
// Price/Time Priority Matching Algorithm (FIFO)
// ============================================================================

use crate::domain::{BookSide, Trade, TradeIdSequencer};
use crate::interfaces::{Aggressor, MatchingAlgorithm};

/// Price/Time Priority (FIFO) matching algorithm
///
/// The best price trades first; at equal price the earliest resting order
/// trades first. Every execution happens at the resting order's price.
///
/// # Example
/// ```text
/// Book:  63500 @ 0.0010 (Order A, t=1)
///        63500 @ 0.0020 (Order B, t=2)
///        63600 @ 0.0050 (Order C, t=3)
///
/// Incoming: Buy 0.0025 @ 63500
/// Result: 0.0010 with A, then 0.0015 with B; C is never reached
/// ```
pub struct PriceTimePriority;

impl PriceTimePriority {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceTimePriority {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingAlgorithm for PriceTimePriority {
    fn match_order(
        &self,
        aggressor: &mut Aggressor,
        opposite_side: &mut BookSide,
        trade_ids: &mut TradeIdSequencer,
    ) -> Vec<Trade> {
        let mut trades = Vec::new();

        while !aggressor.is_filled() {
            let Some(maker) = opposite_side.best() else {
                break;
            };

            // Levels are walked best-first, so the first miss ends the scan
            if !self.prices_cross(aggressor.side, aggressor.limit_price, maker.limit_price) {
                break;
            }

            let quantity = aggressor.remaining.min(maker.amount);
            let Some(fill) = opposite_side.fill_best(quantity) else {
                break;
            };

            aggressor.remaining = aggressor.remaining.saturating_sub(fill.filled);
            trades.push(Trade::new(
                trade_ids.next_id(),
                aggressor.side,
                &aggressor.order_id,
                &fill.order_id,
                fill.limit_price,
                fill.filled,
                aggressor.timestamp,
            ));
        }

        trades
    }

    fn name(&self) -> &str {
        "PriceTime"
    }
}
