// ============================================================================
// Domain Models Module
// Orders, the resting book, trades and engine configuration
// ============================================================================

pub mod config;
pub mod order;
pub mod order_book;
pub mod trade;
pub mod validation;

pub use config::{ConfigError, EngineConfig, DEFAULT_INSTRUMENT};
pub use order::{CancelRequest, NewOrder, OperationType, Order, Side, ValidOrder};
pub use order_book::{
    BookEntry, BookError, BookSide, MakerFill, MarketDepth, OrderBookSnapshot, PriceLevel,
};
pub use trade::{Trade, TradeId, TradeIdSequencer};
pub use validation::{ValidationError, ValidationErrorKind};
