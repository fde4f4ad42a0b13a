// ============================================================================
// Numeric Errors
// Failures raised while parsing or combining fixed-point values
// ============================================================================

use thiserror::Error;

/// Errors that can occur during fixed-point parsing and arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum NumericError {
    /// Result exceeded the representable maximum
    #[error("arithmetic overflow: result exceeded maximum value")]
    Overflow,
    /// Result fell below the representable minimum
    #[error("arithmetic underflow: result below minimum value")]
    Underflow,
    /// More fractional digits than the fixed scale can hold
    #[error("precision loss: value has more fractional digits than supported")]
    PrecisionLoss,
    /// Text is not a plain decimal number
    #[error("invalid input: could not parse value")]
    InvalidInput,
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
