// ============================================================================
// Spot Matcher Library
// Single-instrument limit order book with price/time matching
// ============================================================================

//! # Spot Matcher
//!
//! A deterministic limit order book for one trading pair.
//!
//! ## Features
//!
//! - **Price/time priority** matching, trades execute at the resting price
//! - **Exact fixed-point** amounts and prices (no floating point drift)
//! - **Typed validation**: every rejected request carries a reason code
//! - **Sequential trade ids** (`T1`, `T2`, ...) per engine instance
//! - **JSON batch driver** for `orders.json` to `orderbook.json` + `trades.json`
//!
//! ## Example
//!
//! ```rust
//! use spot_matcher::prelude::*;
//!
//! let mut engine = MatchingEngine::for_instrument("BTC/USDC");
//!
//! engine
//!     .process_order(&Order::create("1", "seller", Side::Sell, "0.0050", "63500.00", "BTC/USDC"))
//!     .unwrap();
//! let outcome = engine
//!     .process_order(&Order::create("2", "buyer", Side::Buy, "0.0023", "63500.00", "BTC/USDC"))
//!     .unwrap();
//!
//! assert_eq!(outcome.trades().len(), 1);
//! assert_eq!(outcome.trades()[0].trade_id.to_string(), "T1");
//!
//! let book = engine.snapshot();
//! assert_eq!(book.sells[0].amount.to_string(), "0.0027");
//! println!("Best ask: {:?}", book.best_ask());
//! ```

#[cfg(feature = "serde")]
pub mod batch;
pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        BookEntry, EngineConfig, Order, OrderBookSnapshot, Side, Trade, TradeId, ValidationError,
        ValidationErrorKind,
    };
    pub use crate::engine::{
        create_from_config, BatchSummary, InstrumentValidator, MatchingEngine,
        MatchingEngineBuilder, OrderOutcome, PriceTimePriority, SharedMatchingEngine,
    };
    pub use crate::interfaces::{
        EventHandler, LoggingEventHandler, MatchingAlgorithm, NoOpEventHandler, OrderEvent,
        OrderValidator, RecordingEventHandler,
    };
    pub use crate::numeric::{Price, Quantity};
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use proptest::prelude::*;

    const PAIR: &str = "BTC/USDC";

    fn dec(text: &str) -> Quantity {
        text.parse().unwrap()
    }

    #[test]
    fn test_exact_cross_clears_book() {
        let mut engine = MatchingEngine::for_instrument(PAIR);
        engine
            .process_order(&Order::create("1", "1", Side::Sell, "0.00230", "63500.00", PAIR))
            .unwrap();
        engine
            .process_order(&Order::create("2", "2", Side::Buy, "0.00230", "63500.00", PAIR))
            .unwrap();

        let trades = engine.trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].amount, dec("0.0023"));
        assert_eq!(trades[0].price, dec("63500"));
        assert_eq!(trades[0].buy_order_id, "2");
        assert_eq!(trades[0].sell_order_id, "1");
        assert!(engine.snapshot().is_empty());
    }

    #[test]
    fn test_partial_fill_keeps_maker_residual() {
        let mut engine = MatchingEngine::for_instrument(PAIR);
        engine
            .process_order(&Order::create("1", "1", Side::Sell, "0.00500", "63500.00", PAIR))
            .unwrap();
        engine
            .process_order(&Order::create("2", "2", Side::Buy, "0.00230", "63500.00", PAIR))
            .unwrap();

        let book = engine.snapshot();
        assert_eq!(engine.trades().len(), 1);
        assert_eq!(engine.trades()[0].amount, dec("0.0023"));
        assert_eq!(book.sells.len(), 1);
        assert_eq!(book.sells[0].amount, dec("0.0027"));
    }

    #[test]
    fn test_create_then_delete() {
        let mut engine = MatchingEngine::for_instrument(PAIR);
        engine
            .process_order(&Order::create("1", "1", Side::Sell, "0.00230", "63500.00", PAIR))
            .unwrap();
        let outcome = engine
            .process_order(&Order::delete("1", "1", Side::Sell, "0.00230", "63500.00", PAIR))
            .unwrap();

        assert!(matches!(outcome, OrderOutcome::Deleted { .. }));
        assert!(engine.snapshot().sells.is_empty());
        assert!(engine.trades().is_empty());
    }

    #[test]
    fn test_negative_amount_rejected_without_side_effects() {
        let mut engine = MatchingEngine::for_instrument(PAIR);
        engine
            .process_order(&Order::create("1", "1", Side::Buy, "1", "63000", PAIR))
            .unwrap();
        let before = engine.snapshot();

        let err = engine
            .process_order(&Order::create("2", "2", Side::Sell, "-0.0023", "63000", PAIR))
            .unwrap_err();

        assert_eq!(err.kind, ValidationErrorKind::InvalidAmount);
        assert_eq!(engine.snapshot(), before);
        assert!(engine.trades().is_empty());
    }

    #[test]
    fn test_empty_book_rests_full_amount() {
        for side in [Side::Buy, Side::Sell] {
            let mut engine = MatchingEngine::for_instrument(PAIR);
            let outcome = engine
                .process_order(&Order::create("1", "1", side, "0.75", "100", PAIR))
                .unwrap();

            assert!(outcome.trades().is_empty());
            let book = engine.snapshot();
            let own = match side {
                Side::Buy => &book.buys,
                Side::Sell => &book.sells,
            };
            assert_eq!(own.len(), 1);
            assert_eq!(own[0].amount, dec("0.75"));
        }
    }

    #[test]
    fn test_amounts_at_the_range_limit() {
        let mut engine = MatchingEngine::for_instrument(PAIR);

        let err = engine
            .process_order(&Order::create("big", "1", Side::Sell, "9223372037", "1", PAIR))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidAmount);

        for id in ["1", "2"] {
            engine
                .process_order(&Order::create(id, id, Side::Sell, "5000000000", "1", PAIR))
                .unwrap();
        }
        assert_eq!(engine.depth(1).asks, vec![(dec("1"), Quantity::MAX)]);

        let outcome = engine
            .process_order(&Order::create("3", "3", Side::Buy, "9223372036.854775807", "1", PAIR))
            .unwrap();
        let fills: Vec<(&str, String)> = outcome
            .trades()
            .iter()
            .map(|t| (t.sell_order_id.as_str(), t.amount.to_string()))
            .collect();
        assert_eq!(
            fills,
            vec![
                ("1", "5000000000".to_string()),
                ("2", "4223372036.854775807".to_string())
            ]
        );
        assert!(engine.bids().is_empty());
        assert_eq!(engine.resting_amount(Side::Sell, "2"), Some(dec("776627963.145224193")));
    }

    #[test]
    fn test_shared_engine_end_to_end() {
        let shared = SharedMatchingEngine::new(
            MatchingEngineBuilder::new(PAIR)
                .with_event_handler(std::sync::Arc::new(LoggingEventHandler))
                .build()
                .unwrap(),
        );
        shared
            .process_order(&Order::create("s", "a", Side::Sell, "2", "10", PAIR))
            .unwrap();
        shared
            .process_order(&Order::create("b", "b", Side::Buy, "1", "11", PAIR))
            .unwrap();

        assert_eq!(shared.trades().len(), 1);
        assert_eq!(shared.trades()[0].price, dec("10"));
        assert_eq!(shared.snapshot().sells[0].amount, dec("1"));
    }

    // ------------------------------------------------------------------------
    // Property tests
    // ------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Action {
        Create { side: Side, amount: Quantity, price: Price },
        Delete { target: usize, side: Side },
    }

    fn side_strategy() -> impl Strategy<Value = Side> {
        prop_oneof![Just(Side::Buy), Just(Side::Sell)]
    }

    /// Mostly small amounts, sometimes a quarter of the range or more, so
    /// two resting orders can add up past `Quantity::MAX`
    fn amount_strategy() -> impl Strategy<Value = Quantity> {
        prop_oneof![
            3 => (1i64..5_000).prop_map(|n| Quantity::from_raw(n * 100_000)),
            1 => (Quantity::MAX.raw_value() / 4..=Quantity::MAX.raw_value())
                .prop_map(Quantity::from_raw),
        ]
    }

    /// A narrow band near 100, or one just under the largest price
    fn price_strategy() -> impl Strategy<Value = Price> {
        prop_oneof![
            3 => (95i64..106).prop_map(|p| Price::from_raw(p * Price::SCALE)),
            1 => (9_223_372_030i64..9_223_372_037).prop_map(|p| Price::from_raw(p * Price::SCALE)),
        ]
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            4 => (side_strategy(), amount_strategy(), price_strategy())
                .prop_map(|(side, amount, price)| Action::Create { side, amount, price }),
            1 => (0usize..64, side_strategy())
                .prop_map(|(target, side)| Action::Delete { target, side }),
        ]
    }

    fn to_order(index: usize, action: &Action) -> Order {
        match action {
            Action::Create { side, amount, price } => Order::create(
                format!("o{index}"),
                "acc",
                *side,
                amount.to_string(),
                price.to_string(),
                PAIR,
            ),
            Action::Delete { target, side } => Order::delete(
                format!("o{target}"),
                "acc",
                *side,
                "1",
                "100",
                PAIR,
            ),
        }
    }

    fn assert_sorted(book: &OrderBookSnapshot) {
        for pair in book.buys.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.limit_price > b.limit_price
                    || (a.limit_price == b.limit_price && a.timestamp < b.timestamp)
            );
        }
        for pair in book.sells.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.limit_price < b.limit_price
                    || (a.limit_price == b.limit_price && a.timestamp < b.timestamp)
            );
        }
    }

    proptest! {
        #[test]
        fn prop_book_stays_sorted_and_uncrossed(
            actions in proptest::collection::vec(action_strategy(), 1..80)
        ) {
            let mut engine = MatchingEngine::for_instrument(PAIR);
            for (index, action) in actions.iter().enumerate() {
                let _ = engine.process_order(&to_order(index, action));

                let depth = engine.depth(3);
                prop_assert!(depth.bids.iter().chain(depth.asks.iter()).all(|(_, qty)| qty.is_positive()));
                let book = engine.snapshot();
                assert_sorted(&book);
                prop_assert!(book.buys.iter().chain(book.sells.iter()).all(|e| e.amount.is_positive()));
                if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
                    prop_assert!(bid < ask);
                }
            }
        }

        #[test]
        fn prop_aggressor_amount_is_conserved(
            actions in proptest::collection::vec(action_strategy(), 1..80)
        ) {
            let mut engine = MatchingEngine::for_instrument(PAIR);
            for (index, action) in actions.iter().enumerate() {
                let order = to_order(index, action);
                let Ok(outcome) = engine.process_order(&order) else {
                    continue;
                };
                if let OrderOutcome::Created { trades, rested, .. } = outcome {
                    let residual = rested.map(|e| e.amount).unwrap_or(Quantity::ZERO);
                    let accounted = Quantity::checked_sum(
                        trades.iter().map(|t| t.amount).chain(std::iter::once(residual)),
                    );
                    prop_assert_eq!(accounted, Ok(order.amount.parse::<Quantity>().unwrap()));

                    let limit: Price = order.limit_price.parse().unwrap();
                    for trade in &trades {
                        match trade.taker_side {
                            Side::Buy => prop_assert!(trade.price <= limit),
                            Side::Sell => prop_assert!(trade.price >= limit),
                        }
                    }
                }
            }

            let ids: Vec<u64> = engine.trades().iter().map(|t| t.trade_id.sequence()).collect();
            let expected: Vec<u64> = (1..=ids.len() as u64).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
