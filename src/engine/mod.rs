// ============================================================================
// Engine Module
// Contains the core matching engine business logic
// ============================================================================

mod matching_engine;
mod price_time;
mod shared;
mod validator;

pub mod factory;

pub use factory::{create_from_config, MatchingEngineBuilder};
pub use matching_engine::{BatchSummary, MatchingEngine, OrderOutcome};
pub use price_time::PriceTimePriority;
pub use shared::SharedMatchingEngine;
pub use validator::InstrumentValidator;
