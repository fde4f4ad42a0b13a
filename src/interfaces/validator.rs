// ============================================================================
// Order Validator Interface
// Gatekeeper consulted before any state mutation
// ============================================================================

use crate::domain::{Order, ValidOrder, ValidationError};

/// Turns an untrusted [`Order`] into a [`ValidOrder`] or explains why not.
///
/// Implementations must be pure: the engine calls this before touching the
/// book, so a rejection guarantees nothing was mutated.
pub trait OrderValidator: Send + Sync {
    fn validate(&self, order: &Order) -> Result<ValidOrder, ValidationError>;

    /// The instrument this validator accepts
    fn instrument(&self) -> &str;
}
