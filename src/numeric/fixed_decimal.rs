// ============================================================================
// Fixed-Point Decimal
// Scaled-integer decimal with compile-time precision
// ============================================================================

use super::errors::{NumericError, NumericResult};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Fixed-point decimal number with compile-time precision.
///
/// Internally stores `value × 10^DECIMALS` as an i64, so equality and
/// comparison are exact integer operations.
///
/// With DECIMALS=9 (default) the range is about ±9.2 billion with a
/// resolution of 0.000000001.
///
/// # Example
/// ```
/// use spot_matcher::numeric::Quantity;
///
/// let total: Quantity = "0.0050".parse().unwrap();
/// let fill: Quantity = "0.0023".parse().unwrap();
/// assert_eq!((total - fill).to_string(), "0.0027");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct FixedDecimal<const DECIMALS: u8 = 9>(i64);

/// Compute 10^n at compile time
const fn pow10(n: u8) -> i64 {
    let mut result: i64 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

impl<const D: u8> FixedDecimal<D> {
    /// The scale factor (10^DECIMALS)
    pub const SCALE: i64 = pow10(D);

    pub const ZERO: Self = Self(0);

    pub const ONE: Self = Self(pow10(D));

    pub const MAX: Self = Self(i64::MAX);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation (already scaled).
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Create from an integer value.
    ///
    /// # Errors
    /// Returns `Overflow` if the value is too large to represent.
    #[inline]
    pub fn from_integer(value: i64) -> NumericResult<Self> {
        value
            .checked_mul(Self::SCALE)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    /// Create from integer and fractional parts, `fraction` being expressed
    /// in units of `10^-DECIMALS` (so `from_parts(0, 2_300_000)` is 0.0023
    /// at nine decimals).
    #[inline]
    pub fn from_parts(integer: i64, fraction: u64) -> NumericResult<Self> {
        if fraction >= Self::SCALE as u64 {
            return Err(NumericError::InvalidInput);
        }

        let int_scaled = integer
            .checked_mul(Self::SCALE)
            .ok_or(NumericError::Overflow)?;

        let frac_signed = if integer < 0 {
            -(fraction as i64)
        } else {
            fraction as i64
        };

        int_scaled
            .checked_add(frac_signed)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub const fn raw_value(self) -> i64 {
        self.0
    }

    /// Integer part (truncated toward zero).
    #[inline]
    pub const fn integer_part(self) -> i64 {
        self.0 / Self::SCALE
    }

    /// Fractional part in units of `10^-DECIMALS`, always positive.
    #[inline]
    pub const fn fractional_part(self) -> u64 {
        (self.0 % Self::SCALE).unsigned_abs()
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    #[inline]
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_add(rhs.0).map(Self).ok_or_else(|| {
            if rhs.0 > 0 {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }

    #[inline]
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_sub(rhs.0).map(Self).ok_or_else(|| {
            if rhs.0 < 0 {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Subtraction clamped to the representable range
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Sum of `values`, failing instead of wrapping or panicking
    pub fn checked_sum<I>(values: I) -> NumericResult<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        values
            .into_iter()
            .try_fold(Self::ZERO, |acc, value| acc.checked_add(value))
    }

    // ========================================================================
    // rust_decimal interop
    // ========================================================================

    /// Convert from `rust_decimal::Decimal`.
    ///
    /// # Errors
    /// - `PrecisionLoss` if the value has more than `DECIMALS` fractional digits
    /// - `Overflow` if the scaled value does not fit in an i64
    pub fn from_decimal(d: Decimal) -> NumericResult<Self> {
        use rust_decimal::prelude::ToPrimitive;

        let d = d.normalize();
        if d.scale() > D as u32 {
            return Err(NumericError::PrecisionLoss);
        }

        let scaled = d
            .checked_mul(Decimal::from(Self::SCALE))
            .ok_or(NumericError::Overflow)?;
        scaled.to_i64().map(Self).ok_or(NumericError::Overflow)
    }
}

impl<const D: u8> PartialOrd for FixedDecimal<D> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const D: u8> Ord for FixedDecimal<D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

// Infallible Add/Sub for ergonomics; panics on overflow, use checked_* where
// the operands are not already bounded.
impl<const D: u8> Add for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("FixedDecimal addition overflow")
    }
}

impl<const D: u8> Sub for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("FixedDecimal subtraction overflow")
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const D: u8> fmt::Debug for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDecimal<{}>({}, raw={})", D, self, self.0)
    }
}

/// Shortest exact decimal form: `63500`, `0.0023`, `-1.5`.
impl<const D: u8> fmt::Display for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let int_part = self.integer_part().unsigned_abs();
        let frac_part = self.fractional_part();

        if D == 0 || frac_part == 0 {
            return write!(f, "{}{}", sign, int_part);
        }

        let digits = format!("{:0>width$}", frac_part, width = D as usize);
        write!(f, "{}{}.{}", sign, int_part, digits.trim_end_matches('0'))
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl<const D: u8> FromStr for FixedDecimal<D> {
    type Err = NumericError;

    /// Parse plain decimal text: an optional sign, digits, and an optional
    /// fractional part. Exponents, digit separators, embedded whitespace,
    /// `NaN` and the like are rejected.
    ///
    /// - "63500.00" -> 63500
    /// - "-0.0023" -> -0.0023
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
        if !unsigned.bytes().any(|b| b.is_ascii_digit())
            || !unsigned.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        {
            return Err(NumericError::InvalidInput);
        }

        let decimal = Decimal::from_str_exact(text).map_err(|err| match err {
            rust_decimal::Error::ExceedsMaximumPossibleValue
            | rust_decimal::Error::LessThanMinimumPossibleValue => NumericError::Overflow,
            rust_decimal::Error::Underflow => NumericError::PrecisionLoss,
            _ => NumericError::InvalidInput,
        })?;

        Self::from_decimal(decimal)
    }
}

// ============================================================================
// Serde (decimal strings, never floats)
// ============================================================================

#[cfg(feature = "serde")]
impl<const D: u8> serde::Serialize for FixedDecimal<D> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, const D: u8> serde::Deserialize<'de> for FixedDecimal<D> {
    fn deserialize<De: serde::Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// Limit or execution price, nine decimal places
pub type Price = FixedDecimal<9>;

/// Order or trade amount, nine decimal places
pub type Quantity = FixedDecimal<9>;
