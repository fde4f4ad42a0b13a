// ============================================================================
// Basic Usage Example
// ============================================================================

use spot_matcher::prelude::*;
use std::sync::Arc;

const PAIR: &str = "BTC/USDC";

fn main() {
    println!("=== Spot Matcher Example ===\n");

    let recorder = Arc::new(RecordingEventHandler::new());
    let mut engine = MatchingEngineBuilder::new(PAIR)
        .with_event_handler(recorder.clone())
        .build()
        .expect("valid configuration");

    println!("Created matching engine for {}\n", engine.instrument());

    // Add sell orders at different prices
    println!("Adding sell orders...");
    for i in 0u32..5 {
        let sell = Order::create(
            format!("seller_{}", i),
            format!("acc_s{}", i),
            Side::Sell,
            "1",
            (50000 + i * 100).to_string(),
            PAIR,
        );
        engine.process_order(&sell).expect("valid order");
    }

    // Add buy orders
    println!("Adding buy orders...");
    for i in 0u32..5 {
        let buy = Order::create(
            format!("buyer_{}", i),
            format!("acc_b{}", i),
            Side::Buy,
            "1",
            (49900 - i * 100).to_string(),
            PAIR,
        );
        engine.process_order(&buy).expect("valid order");
    }

    println!("\n=== Market Depth ===");
    let depth = engine.depth(5);

    println!("\nBids:");
    for (price, qty) in &depth.bids {
        println!("  {} @ {}", qty, price);
    }

    println!("\nAsks:");
    for (price, qty) in &depth.asks {
        println!("  {} @ {}", qty, price);
    }

    println!("\nSpread: {:?}", engine.spread().map(|s| s.to_string()));

    // Aggressive buy that crosses the first three ask levels
    println!("\n=== Submitting Crossing Order ===");
    let crossing_buy = Order::create("taker", "acc_t", Side::Buy, "2.5", "50200", PAIR);
    let outcome = engine.process_order(&crossing_buy).expect("valid order");

    for trade in outcome.trades() {
        println!(
            "  Trade {}: buy {} / sell {} {} @ {}",
            trade.trade_id, trade.buy_order_id, trade.sell_order_id, trade.amount, trade.price
        );
    }

    // Cancel a resting order, then one that does not exist
    println!("\n=== Deleting Orders ===");
    let delete = Order::delete("buyer_4", "acc_b4", Side::Buy, "1", "49500", PAIR);
    println!("  buyer_4: {:?}", engine.process_order(&delete).map(|o| o.is_noop()));
    let delete = Order::delete("ghost", "acc_x", Side::Buy, "1", "49500", PAIR);
    println!("  ghost:   {:?}", engine.process_order(&delete).map(|o| o.is_noop()));

    // A rejected order leaves the book untouched
    let bad = Order::create("bad", "acc_x", Side::Sell, "-0.0023", "50000", PAIR);
    if let Err(err) = engine.process_order(&bad) {
        println!("\nRejected: {}", err);
    }

    println!("\n=== Final Order Book ===");
    let book = engine.snapshot();
    println!("Buys: {} orders", book.buys.len());
    println!("Sells: {} orders", book.sells.len());
    println!("Trades: {}", engine.trades().len());
    println!("Events recorded: {}", recorder.events().len());
}
