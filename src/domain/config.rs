// ============================================================================
// Engine Configuration
// ============================================================================

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Instrument traded when nothing else is configured
pub const DEFAULT_INSTRUMENT: &str = "BTC/USDC";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("instrument cannot be empty")]
    EmptyInstrument,
    #[error("instrument {0:?} has leading or trailing whitespace")]
    PaddedInstrument(String),
}

/// Configuration for one matching engine (one instrument, one book)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// The only `pair` value accepted by validation (e.g. "BTC/USDC")
    pub instrument: String,

    /// Initial capacity reserved for the trade log
    pub trade_log_capacity: usize,
}

impl EngineConfig {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            trade_log_capacity: 0,
        }
    }

    /// Builder method: reserve room for an expected number of trades
    pub fn with_trade_log_capacity(mut self, capacity: usize) -> Self {
        self.trade_log_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instrument.is_empty() {
            return Err(ConfigError::EmptyInstrument);
        }
        if self.instrument.trim() != self.instrument {
            return Err(ConfigError::PaddedInstrument(self.instrument.clone()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUMENT)
    }
}
