// ============================================================================
// Matching Engine
// Order lifecycle: validate, match, rest, delete
// ============================================================================

use crate::domain::{
    BookEntry, BookSide, CancelRequest, EngineConfig, MarketDepth, NewOrder, Order,
    OrderBookSnapshot, Side, Trade, TradeId, TradeIdSequencer, ValidOrder, ValidationError,
    ValidationErrorKind,
};
use crate::interfaces::{
    Aggressor, EventHandler, MatchingAlgorithm, NoOpEventHandler, OrderEvent, OrderValidator,
};
use crate::numeric::{Price, Quantity};
use std::sync::Arc;

use super::{InstrumentValidator, PriceTimePriority};

/// Result of one accepted order request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// CREATE ran to completion. `rested` is the residual placed on the
    /// book, `None` when the order was fully filled.
    Created {
        order_id: String,
        trades: Vec<Trade>,
        rested: Option<BookEntry>,
    },
    /// DELETE removed this resting entry
    Deleted { entry: BookEntry },
    /// DELETE named an order that is not resting on that side; nothing changed
    NotFound { order_id: String, side: Side },
}

impl OrderOutcome {
    /// Trades produced by this request (empty for deletes)
    pub fn trades(&self) -> &[Trade] {
        match self {
            OrderOutcome::Created { trades, .. } => trades,
            _ => &[],
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, OrderOutcome::NotFound { .. })
    }
}

/// Tally of a batch run through [`MatchingEngine::process_batch`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub received: usize,
    pub created: usize,
    pub deleted: usize,
    pub missed_deletes: usize,
    pub trades: usize,
    pub rejections: Vec<ValidationError>,
}

impl BatchSummary {
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }
}

/// Single-instrument matching engine.
///
/// Owns both sides of the book, the trade log and the trade id sequencer.
/// Every mutating call takes `&mut self` and runs to completion, so a given
/// sequence of orders always produces the same book and trades. Wrap it in a
/// [`SharedMatchingEngine`](super::SharedMatchingEngine) to share it.
pub struct MatchingEngine {
    config: EngineConfig,

    bids: BookSide,

    asks: BookSide,

    algorithm: Box<dyn MatchingAlgorithm>,

    validator: Box<dyn OrderValidator>,

    event_handler: Arc<dyn EventHandler>,

    trade_ids: TradeIdSequencer,

    /// Insertion sequence handed to each accepted CREATE
    sequence: u64,

    /// Append-only trade log, in execution order
    trades: Vec<Trade>,
}

impl MatchingEngine {
    pub fn new(
        config: EngineConfig,
        algorithm: Box<dyn MatchingAlgorithm>,
        validator: Box<dyn OrderValidator>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        let trades = Vec::with_capacity(config.trade_log_capacity);
        Self {
            config,
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            algorithm,
            validator,
            event_handler,
            trade_ids: TradeIdSequencer::new(),
            sequence: 0,
            trades,
        }
    }

    /// Price/time matching, field validation for `instrument`, no events
    pub fn for_instrument(instrument: impl Into<String>) -> Self {
        let config = EngineConfig::new(instrument);
        let validator = InstrumentValidator::new(config.instrument.clone());
        Self::new(
            config,
            Box::new(PriceTimePriority::new()),
            Box::new(validator),
            Arc::new(NoOpEventHandler),
        )
    }

    /// Process one order request.
    ///
    /// A rejected request returns `Err` and leaves the book and trade log
    /// exactly as they were. Deleting an order that is not resting is not an
    /// error: it returns [`OrderOutcome::NotFound`].
    pub fn process_order(&mut self, order: &Order) -> Result<OrderOutcome, ValidationError> {
        let validated = match self.validator.validate(order) {
            Ok(validated) => validated,
            Err(error) => return Err(self.reject(error)),
        };

        let outcome = match validated {
            ValidOrder::Create(new_order) => {
                if self.side(new_order.side).contains(&new_order.order_id) {
                    let error = ValidationError::new(
                        new_order.order_id.clone(),
                        ValidationErrorKind::DuplicateOrderId,
                        format!(
                            "Order {} is already resting on the {} side",
                            new_order.order_id, new_order.side
                        ),
                    );
                    return Err(self.reject(error));
                }
                self.handle_create(new_order)
            },
            ValidOrder::Delete(cancel) => self.handle_delete(cancel),
        };

        Ok(outcome)
    }

    /// Process orders strictly in arrival order. Rejections are collected,
    /// never fatal.
    pub fn process_batch<'a, I>(&mut self, orders: I) -> BatchSummary
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut summary = BatchSummary::default();

        for order in orders {
            summary.received += 1;
            match self.process_order(order) {
                Ok(OrderOutcome::Created { trades, .. }) => {
                    summary.created += 1;
                    summary.trades += trades.len();
                },
                Ok(OrderOutcome::Deleted { .. }) => summary.deleted += 1,
                Ok(OrderOutcome::NotFound { .. }) => summary.missed_deletes += 1,
                Err(error) => summary.rejections.push(error),
            }
        }

        summary
    }

    // ========================================================================
    // Read-only views
    // ========================================================================

    /// Copy of both sides in priority order
    pub fn snapshot(&self) -> OrderBookSnapshot {
        OrderBookSnapshot::capture(&self.bids, &self.asks)
    }

    /// Every trade executed so far, oldest first
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    pub fn depth(&self, num_levels: usize) -> MarketDepth {
        MarketDepth {
            bids: self.bids.get_depth(num_levels),
            asks: self.asks.get_depth(num_levels),
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => ask.checked_sub(bid).ok(),
            _ => None,
        }
    }

    /// Amount still resting for `order_id` on `side`, if any
    pub fn resting_amount(&self, side: Side, order_id: &str) -> Option<Quantity> {
        self.side(side).get(order_id).map(|entry| entry.amount)
    }

    pub fn instrument(&self) -> &str {
        &self.config.instrument
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn algorithm_name(&self) -> &str {
        self.algorithm.name()
    }

    /// Id the next trade will receive
    pub fn next_trade_id(&self) -> TradeId {
        self.trade_ids.peek()
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn reject(&self, error: ValidationError) -> ValidationError {
        self.event_handler.on_event(OrderEvent::OrderRejected {
            error: error.clone(),
        });
        error
    }

    fn handle_create(&mut self, order: NewOrder) -> OrderOutcome {
        self.sequence += 1;
        let mut aggressor = Aggressor {
            order_id: order.order_id,
            side: order.side,
            limit_price: order.limit_price,
            remaining: order.amount,
            timestamp: self.sequence,
        };

        let (own_side, opposite_side) = match aggressor.side {
            Side::Buy => (&mut self.bids, &mut self.asks),
            Side::Sell => (&mut self.asks, &mut self.bids),
        };

        let trades =
            self.algorithm
                .match_order(&mut aggressor, opposite_side, &mut self.trade_ids);

        let mut events: Vec<OrderEvent> = trades
            .iter()
            .map(|trade| OrderEvent::TradeExecuted {
                trade: trade.clone(),
            })
            .collect();

        let rested = if aggressor.is_filled() {
            None
        } else {
            let entry = BookEntry {
                order_id: aggressor.order_id.clone(),
                account_id: order.account_id,
                amount: aggressor.remaining,
                limit_price: aggressor.limit_price,
                side: aggressor.side,
                timestamp: aggressor.timestamp,
            };
            match own_side.insert(entry.clone()) {
                Ok(()) => {
                    events.push(OrderEvent::OrderRested {
                        order_id: entry.order_id.clone(),
                        side: entry.side,
                        price: entry.limit_price,
                        amount: entry.amount,
                        timestamp: entry.timestamp,
                    });
                    Some(entry)
                },
                Err(err) => {
                    // Duplicates are refused before matching and the residual
                    // is positive, so this only fires on a broken invariant
                    tracing::error!(%err, "Residual could not rest on the book");
                    None
                },
            }
        };

        events.push(OrderEvent::CreateProcessed {
            order_id: aggressor.order_id.clone(),
            side: aggressor.side,
            trades: trades.len(),
            rested: rested.as_ref().map(|entry| entry.amount),
        });
        self.event_handler.on_events(events);

        self.trades.extend(trades.iter().cloned());

        OrderOutcome::Created {
            order_id: aggressor.order_id,
            trades,
            rested,
        }
    }

    fn handle_delete(&mut self, cancel: CancelRequest) -> OrderOutcome {
        let book_side = match cancel.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };

        match book_side.remove(&cancel.order_id) {
            Some(entry) => {
                self.event_handler.on_event(OrderEvent::OrderDeleted {
                    order_id: entry.order_id.clone(),
                    side: entry.side,
                    amount: entry.amount,
                });
                OrderOutcome::Deleted { entry }
            },
            None => {
                self.event_handler.on_event(OrderEvent::DeleteIgnored {
                    order_id: cancel.order_id.clone(),
                    side: cancel.side,
                });
                OrderOutcome::NotFound {
                    order_id: cancel.order_id,
                    side: cancel.side,
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::RecordingEventHandler;

    const PAIR: &str = "BTC/USDC";

    fn dec(text: &str) -> Quantity {
        text.parse().unwrap()
    }

    fn create(id: &str, side: Side, amount: &str, price: &str) -> Order {
        Order::create(id, format!("acc-{id}"), side, amount, price, PAIR)
    }

    fn delete(id: &str, side: Side) -> Order {
        Order::delete(id, format!("acc-{id}"), side, "0.00230", "63500.00", PAIR)
    }

    fn engine() -> MatchingEngine {
        MatchingEngine::for_instrument(PAIR)
    }

    #[test]
    fn test_full_match_empties_book() {
        let mut engine = engine();
        engine
            .process_order(&create("1", Side::Sell, "0.00230", "63500.00"))
            .unwrap();
        let outcome = engine
            .process_order(&create("2", Side::Buy, "0.00230", "63500.00"))
            .unwrap();

        let trades = outcome.trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].buy_order_id, "2");
        assert_eq!(trades[0].sell_order_id, "1");
        assert_eq!(trades[0].amount, dec("0.0023"));
        assert_eq!(trades[0].price, dec("63500"));
        assert!(matches!(outcome, OrderOutcome::Created { rested: None, .. }));

        let book = engine.snapshot();
        assert!(book.buys.is_empty());
        assert!(book.sells.is_empty());
        assert_eq!(engine.trades().len(), 1);
    }

    #[test]
    fn test_partial_match_leaves_exact_residual() {
        let mut engine = engine();
        engine
            .process_order(&create("1", Side::Sell, "0.00500", "63500.00"))
            .unwrap();
        engine
            .process_order(&create("2", Side::Buy, "0.00230", "63500.00"))
            .unwrap();

        assert_eq!(engine.trades().len(), 1);
        assert_eq!(engine.trades()[0].amount, dec("0.0023"));

        let book = engine.snapshot();
        assert_eq!(book.sells.len(), 1);
        assert_eq!(book.sells[0].amount, dec("0.0027"));
        assert_eq!(engine.resting_amount(Side::Sell, "1"), Some(dec("0.0027")));
        assert!(book.buys.is_empty());
    }

    #[test]
    fn test_residual_rests_on_aggressor_side() {
        let mut engine = engine();
        engine
            .process_order(&create("s", Side::Sell, "1", "100"))
            .unwrap();
        let outcome = engine
            .process_order(&create("b", Side::Buy, "3", "101"))
            .unwrap();

        match outcome {
            OrderOutcome::Created { rested: Some(entry), trades, .. } => {
                assert_eq!(trades.len(), 1);
                assert_eq!(trades[0].price, dec("100"));
                assert_eq!(entry.side, Side::Buy);
                assert_eq!(entry.amount, dec("2"));
                assert_eq!(entry.limit_price, dec("101"));
            },
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(engine.asks().is_empty());
        assert_eq!(engine.best_bid(), Some(dec("101")));
    }

    #[test]
    fn test_delete_existing_order() {
        let mut engine = engine();
        engine
            .process_order(&create("1", Side::Sell, "0.00230", "63500.00"))
            .unwrap();
        let outcome = engine.process_order(&delete("1", Side::Sell)).unwrap();

        assert!(matches!(outcome, OrderOutcome::Deleted { ref entry } if entry.order_id == "1"));
        assert!(engine.snapshot().is_empty());
        assert!(engine.trades().is_empty());
    }

    #[test]
    fn test_delete_missing_order_is_noop() {
        let mut engine = engine();
        engine
            .process_order(&create("1", Side::Sell, "1", "100"))
            .unwrap();
        let before = engine.snapshot();

        // Right id, wrong side
        let outcome = engine.process_order(&delete("1", Side::Buy)).unwrap();
        assert!(outcome.is_noop());
        let outcome = engine.process_order(&delete("42", Side::Sell)).unwrap();
        assert!(outcome.is_noop());

        assert_eq!(engine.snapshot(), before);
        assert!(engine.trades().is_empty());
    }

    #[test]
    fn test_rejected_order_mutates_nothing() {
        let mut engine = engine();
        engine
            .process_order(&create("1", Side::Sell, "0.005", "63500"))
            .unwrap();
        let book_before = engine.snapshot();
        let next_id = engine.next_trade_id();

        let bad = create("2", Side::Buy, "-0.0023", "63500.00");
        let err = engine.process_order(&bad).unwrap_err();

        assert_eq!(err.kind, ValidationErrorKind::InvalidAmount);
        assert_eq!(err.order_id, "2");
        assert_eq!(engine.snapshot(), book_before);
        assert!(engine.trades().is_empty());
        assert_eq!(engine.next_trade_id(), next_id);
    }

    #[test]
    fn test_duplicate_resting_id_rejected() {
        let mut engine = engine();
        engine
            .process_order(&create("1", Side::Buy, "1", "100"))
            .unwrap();
        let err = engine
            .process_order(&create("1", Side::Buy, "2", "99"))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DuplicateOrderId);
        assert_eq!(engine.bids().len(), 1);

        // Same id on the other side is a different order
        engine
            .process_order(&create("1", Side::Sell, "1", "150"))
            .unwrap();
        assert_eq!(engine.asks().len(), 1);
    }

    #[test]
    fn test_trade_ids_continue_across_orders() {
        let mut engine = engine();
        engine
            .process_order(&create("s1", Side::Sell, "1", "100"))
            .unwrap();
        engine
            .process_order(&create("s2", Side::Sell, "1", "101"))
            .unwrap();
        engine
            .process_order(&create("b1", Side::Buy, "1.5", "101"))
            .unwrap();
        engine
            .process_order(&create("s3", Side::Sell, "1", "90"))
            .unwrap();

        let ids: Vec<String> = engine
            .trades()
            .iter()
            .map(|t| t.trade_id.to_string())
            .collect();
        assert_eq!(ids, vec!["T1", "T2"]);
        assert_eq!(engine.next_trade_id().to_string(), "T3");
        // s3 crossed nothing: the only bid was filled, s2 still rests at 101
        assert_eq!(engine.resting_amount(Side::Sell, "s2"), Some(dec("0.5")));
        assert_eq!(engine.resting_amount(Side::Sell, "s3"), Some(dec("1")));
    }

    #[test]
    fn test_independent_engines_do_not_share_sequencers() {
        let mut first = engine();
        let mut second = engine();
        for engine in [&mut first, &mut second] {
            engine
                .process_order(&create("s", Side::Sell, "1", "100"))
                .unwrap();
            engine
                .process_order(&create("b", Side::Buy, "1", "100"))
                .unwrap();
        }
        assert_eq!(first.trades()[0].trade_id.to_string(), "T1");
        assert_eq!(second.trades()[0].trade_id.to_string(), "T1");
    }

    #[test]
    fn test_process_batch_summary() {
        let mut engine = engine();
        let orders = vec![
            create("1", Side::Sell, "0.005", "63500"),
            create("2", Side::Buy, "0.002", "63500"),
            create("3", Side::Buy, "abc", "63500"),
            delete("1", Side::Sell),
            delete("1", Side::Sell),
            create("4", Side::Buy, "1", "63000"),
        ];

        let summary = engine.process_batch(&orders);

        assert_eq!(summary.received, 6);
        assert_eq!(summary.created, 3);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.missed_deletes, 1);
        assert_eq!(summary.trades, 1);
        assert_eq!(summary.rejected(), 1);
        assert_eq!(summary.rejections[0].order_id, "3");
        assert!(engine.asks().is_empty());
        assert_eq!(engine.bids().len(), 1);
    }

    #[test]
    fn test_events_emitted_in_order() {
        let recorder = Arc::new(RecordingEventHandler::new());
        let mut engine = MatchingEngine::new(
            EngineConfig::new(PAIR),
            Box::new(PriceTimePriority::new()),
            Box::new(InstrumentValidator::new(PAIR)),
            recorder.clone(),
        );

        engine
            .process_order(&create("1", Side::Sell, "1", "100"))
            .unwrap();
        engine
            .process_order(&create("2", Side::Buy, "2", "100"))
            .unwrap();
        engine.process_order(&delete("9", Side::Buy)).unwrap();
        let _ = engine.process_order(&create("", Side::Buy, "1", "100"));

        let events = recorder.take();
        let names: Vec<&str> = events
            .iter()
            .map(|e| match e {
                OrderEvent::OrderRejected { .. } => "rejected",
                OrderEvent::TradeExecuted { .. } => "trade",
                OrderEvent::OrderRested { .. } => "rested",
                OrderEvent::CreateProcessed { .. } => "created",
                OrderEvent::OrderDeleted { .. } => "deleted",
                OrderEvent::DeleteIgnored { .. } => "ignored",
            })
            .collect();
        assert_eq!(
            names,
            vec!["rested", "created", "trade", "rested", "created", "ignored", "rejected"]
        );
    }

    #[test]
    fn test_market_data_views() {
        let mut engine = engine();
        for (id, side, amount, price) in [
            ("b1", Side::Buy, "1", "99"),
            ("b2", Side::Buy, "2", "99"),
            ("b3", Side::Buy, "1", "98"),
            ("s1", Side::Sell, "1", "101"),
        ] {
            engine.process_order(&create(id, side, amount, price)).unwrap();
        }

        let depth = engine.depth(1);
        assert_eq!(depth.bids, vec![(dec("99"), dec("3"))]);
        assert_eq!(depth.asks, vec![(dec("101"), dec("1"))]);
        assert_eq!(engine.spread(), Some(dec("2")));
        assert_eq!(engine.instrument(), PAIR);
        assert_eq!(engine.algorithm_name(), "PriceTime");
    }
}
