// ============================================================================
// Event Handler Interface
// Defines the contract for observing order lifecycle and trade events
// ============================================================================

use crate::domain::{Side, Trade, ValidationError};
use crate::numeric::{Price, Quantity};
use parking_lot::Mutex;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Events emitted by the matching engine, in the order they happen
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum OrderEvent {
    /// Order refused by validation; nothing was mutated
    OrderRejected { error: ValidationError },

    /// One execution between the aggressor and a resting order
    TradeExecuted { trade: Trade },

    /// Residual of a CREATE placed on its own side
    OrderRested {
        order_id: String,
        side: Side,
        price: Price,
        amount: Quantity,
        timestamp: u64,
    },

    /// A CREATE ran to completion
    CreateProcessed {
        order_id: String,
        side: Side,
        trades: usize,
        rested: Option<Quantity>,
    },

    /// A DELETE removed a resting order
    OrderDeleted {
        order_id: String,
        side: Side,
        amount: Quantity,
    },

    /// A DELETE named an order that is not resting; no-op
    DeleteIgnored { order_id: String, side: Side },
}

/// Event handler trait for observing matching engine events
/// Implementations can handle logging, auditing, notifications, etc.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: OrderEvent);

    fn on_events(&self, events: Vec<OrderEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: OrderEvent) {}
}

/// Writes every event through `tracing`
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        match event {
            OrderEvent::OrderRejected { error } => {
                tracing::warn!(
                    order_id = %error.order_id,
                    kind = %error.kind,
                    "Error processing order {}: {}",
                    error.order_id,
                    error.detail
                );
            },
            OrderEvent::TradeExecuted { trade } => {
                tracing::debug!(
                    trade_id = %trade.trade_id,
                    buy_order_id = %trade.buy_order_id,
                    sell_order_id = %trade.sell_order_id,
                    maker = %trade.maker_order_id(),
                    taker = %trade.taker_order_id(),
                    amount = %trade.amount,
                    price = %trade.price,
                    "Trade executed"
                );
            },
            OrderEvent::OrderRested {
                order_id,
                side,
                price,
                amount,
                ..
            } => {
                tracing::debug!(%order_id, %side, %price, %amount, "Order rested on book");
            },
            OrderEvent::CreateProcessed {
                order_id, trades, ..
            } => {
                tracing::info!(
                    %order_id,
                    trades,
                    "Processed CREATE order {}: {} trades executed",
                    order_id,
                    trades
                );
            },
            OrderEvent::OrderDeleted { order_id, side, .. } => {
                tracing::info!(%order_id, %side, "Deleted order {}", order_id);
            },
            OrderEvent::DeleteIgnored { order_id, side } => {
                tracing::warn!(
                    %order_id,
                    %side,
                    "Attempted to delete non-existent order {}",
                    order_id
                );
            },
        }
    }
}

/// Keeps every event in memory, for tests and audit dumps
#[derive(Default)]
pub struct RecordingEventHandler {
    events: Mutex<Vec<OrderEvent>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<OrderEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for RecordingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        self.events.lock().push(event);
    }
}
