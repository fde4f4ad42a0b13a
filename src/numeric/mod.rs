// ============================================================================
// Numeric Module
// Fixed-point arithmetic for amounts and prices
// ============================================================================
//
// Amounts and limit prices arrive as decimal text. They are parsed straight
// into scaled integers so that a fully consumed order is exactly zero and
// never a floating-point residue.

mod errors;
mod fixed_decimal;

pub use errors::{NumericError, NumericResult};
pub use fixed_decimal::{FixedDecimal, Price, Quantity};
