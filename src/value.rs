//! Numeric element type accepted by the dispatch layer.
//!
//! JSON does not distinguish integers from floats at the type level, but the
//! front-end does: `[5, 3]` must come back as `[3, 5]`, not `[3.0, 5.0]`.
//! `Number` keeps the distinction while still comparing across both forms.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A sortable number: integer or float.
///
/// # Examples
///
/// ```
/// use sortrace::Number;
///
/// assert!(Number::Int(2) < Number::Float(2.5));
/// assert!(Number::Float(f64::NAN).partial_cmp(&Number::Int(0)).is_none());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Returns the value as `f64`, rounding integers beyond 2^53.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Returns true if this value takes part in a total order.
    #[must_use]
    pub fn is_comparable(self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(v) => !v.is_nan(),
        }
    }

    /// Converts a decoded JSON value into a number.
    ///
    /// `index` is the element position, used only for the error.
    pub fn from_json(value: &serde_json::Value, index: usize) -> Result<Self, ValidationError> {
        let serde_json::Value::Number(n) = value else {
            return Err(ValidationError::NonNumericElement { index });
        };
        if let Some(i) = n.as_i64() {
            return Ok(Self::Int(i));
        }
        n.as_f64()
            .map(Self::Float)
            .ok_or(ValidationError::NonNumericElement { index })
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(&b),
            (Self::Int(a), Self::Float(b)) => cmp_int_float(a, b),
            (Self::Float(a), Self::Int(b)) => cmp_int_float(b, a).map(Ordering::reverse),
        }
    }
}

/// 2^63, exactly representable as `f64`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// Compares an integer with a float without rounding the integer.
///
/// Exact beyond 2^53, where an `i64` to `f64` cast would round.
#[allow(clippy::cast_possible_truncation)]
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if float < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }

    // In range: the integral part fits in i64 and the fraction is exact.
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        unequal => Some(unequal),
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
pub(crate) fn ints(values: &[i64]) -> Vec<Number> {
    values.iter().copied().map(Number::Int).collect()
}
