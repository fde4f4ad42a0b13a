// ============================================================================
// Interfaces Module
// Seams between the engine and its collaborators
// ============================================================================

mod event_handler;
mod matching_algorithm;
mod validator;

pub use event_handler::{
    EventHandler, LoggingEventHandler, NoOpEventHandler, OrderEvent, RecordingEventHandler,
};
pub use matching_algorithm::{Aggressor, MatchingAlgorithm};
pub use validator::OrderValidator;
