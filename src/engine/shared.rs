// ============================================================================
// Shared Matching Engine
// Thread-safe handle over a single matching engine
// ============================================================================

use crate::domain::{Order, OrderBookSnapshot, Trade, ValidationError};
use crate::engine::{MatchingEngine, OrderOutcome};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle that serializes every call on one [`MatchingEngine`].
///
/// Each order runs to completion under the lock, so concurrent callers see
/// the same book and trades as if their orders had arrived one by one in
/// lock-acquisition order.
#[derive(Clone)]
pub struct SharedMatchingEngine {
    inner: Arc<Mutex<MatchingEngine>>,
}

impl SharedMatchingEngine {
    pub fn new(engine: MatchingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn process_order(&self, order: &Order) -> Result<OrderOutcome, ValidationError> {
        self.inner.lock().process_order(order)
    }

    pub fn snapshot(&self) -> OrderBookSnapshot {
        self.inner.lock().snapshot()
    }

    /// Copy of the trade log
    pub fn trades(&self) -> Vec<Trade> {
        self.inner.lock().trades().to_vec()
    }

    /// Run `f` with exclusive access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut MatchingEngine) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<MatchingEngine> for SharedMatchingEngine {
    fn from(engine: MatchingEngine) -> Self {
        Self::new(engine)
    }
}
