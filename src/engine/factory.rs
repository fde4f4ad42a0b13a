// ============================================================================
// Matching Engine Factory
// Creates matching engines with proper configuration
// ============================================================================

use crate::domain::{ConfigError, EngineConfig};
use crate::engine::{InstrumentValidator, MatchingEngine, PriceTimePriority};
use crate::interfaces::{EventHandler, MatchingAlgorithm, NoOpEventHandler, OrderValidator};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a price/time matching engine from configuration
///
/// # Example
/// ```
/// use spot_matcher::prelude::*;
/// use spot_matcher::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let config = EngineConfig::new("ETH/USDC");
/// let engine = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(engine.instrument(), "ETH/USDC");
/// ```
pub fn create_from_config(
    config: EngineConfig,
    event_handler: Arc<dyn EventHandler>,
) -> Result<MatchingEngine, ConfigError> {
    config.validate()?;

    let validator = InstrumentValidator::new(config.instrument.clone());

    Ok(MatchingEngine::new(
        config,
        Box::new(PriceTimePriority::new()),
        Box::new(validator),
        event_handler,
    ))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating matching engines with fluent API
///
/// Every seam defaults to the stock implementation: price/time matching,
/// [`InstrumentValidator`] for the configured instrument, no events.
///
/// # Example
/// ```
/// use spot_matcher::prelude::*;
/// use std::sync::Arc;
///
/// let engine = MatchingEngineBuilder::new("BTC/USDC")
///     .with_trade_log_capacity(4096)
///     .with_event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert_eq!(engine.instrument(), "BTC/USDC");
/// ```
pub struct MatchingEngineBuilder {
    config: EngineConfig,
    algorithm: Option<Box<dyn MatchingAlgorithm>>,
    validator: Option<Box<dyn OrderValidator>>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl MatchingEngineBuilder {
    /// Create a new builder for the specified instrument
    pub fn new(instrument: impl Into<String>) -> Self {
        Self::from_config(EngineConfig::new(instrument))
    }

    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            algorithm: None,
            validator: None,
            event_handler: None,
        }
    }

    pub fn with_trade_log_capacity(mut self, capacity: usize) -> Self {
        self.config.trade_log_capacity = capacity;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Box<dyn MatchingAlgorithm>) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Replace the field checks. The validator decides which instrument is
    /// accepted, so it should agree with the configured one.
    pub fn with_validator(mut self, validator: Box<dyn OrderValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(event_handler);
        self
    }

    /// Get the configuration without building (for inspection)
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the matching engine
    pub fn build(self) -> Result<MatchingEngine, ConfigError> {
        self.config.validate()?;

        let algorithm = self
            .algorithm
            .unwrap_or_else(|| Box::new(PriceTimePriority::new()));
        let validator = match self.validator {
            Some(validator) => validator,
            None => Box::new(InstrumentValidator::new(self.config.instrument.clone())),
        };
        let event_handler = self
            .event_handler
            .unwrap_or_else(|| Arc::new(NoOpEventHandler));

        Ok(MatchingEngine::new(
            self.config,
            algorithm,
            validator,
            event_handler,
        ))
    }
}
