//! Request validation and dispatch limits.
//!
//! Sorts are unbounded internally; the only guard against very large or
//! adversarial requests is the limits applied here, before any sort runs.
//! Quadratic sorts record a quadratic number of steps, so besides the element
//! count the batch's worst-case trace length is bounded too.

use crate::algorithms::{ensure_comparable, Algorithm};
use crate::dispatch::request::SortRequest;
use crate::error::ValidationError;

/// Default upper bound on elements per request.
pub const DEFAULT_MAX_ELEMENTS: usize = 10_000;

/// Default upper bound on algorithm identifiers per request.
pub const DEFAULT_MAX_ALGORITHMS: usize = 16;

/// Default upper bound on the worst-case steps recorded by one batch.
///
/// Sized so the serialized response stays below the gRPC response limit.
pub const DEFAULT_MAX_TRACE_STEPS: usize = 1_500_000;

/// Upper bound on the length of a single algorithm identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Limits applied to every batch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Maximum number of elements in `array`.
    pub max_elements: usize,
    /// Maximum number of entries in `algorithms`.
    pub max_algorithms: usize,
    /// Maximum worst-case step count summed over the batch.
    pub max_trace_steps: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_elements: DEFAULT_MAX_ELEMENTS,
            max_algorithms: DEFAULT_MAX_ALGORITHMS,
            max_trace_steps: DEFAULT_MAX_TRACE_STEPS,
        }
    }
}

impl DispatchConfig {
    /// Rejects a batch whose traces could exceed `max_trace_steps` for some
    /// input order of `len` elements.
    pub fn check_trace_budget(
        &self,
        len: usize,
        algorithms: impl IntoIterator<Item = Algorithm>,
    ) -> Result<(), ValidationError> {
        let bound = algorithms
            .into_iter()
            .fold(0_usize, |acc, a| acc.saturating_add(a.max_steps(len)));
        if bound > self.max_trace_steps {
            return Err(ValidationError::TraceTooLarge {
                bound,
                max: self.max_trace_steps,
            });
        }
        Ok(())
    }
}

impl SortRequest {
    /// Validates this request against `config`.
    ///
    /// Unknown identifiers are not an error here; they are reported per
    /// algorithm in the batch response.
    pub fn validate(&self, config: &DispatchConfig) -> Result<(), ValidationError> {
        if self.algorithms.is_empty() {
            return Err(ValidationError::MissingField {
                field: "algorithms".to_string(),
            });
        }
        if self.algorithms.len() > config.max_algorithms {
            return Err(ValidationError::FieldTooLong {
                field: "algorithms".to_string(),
                max_length: config.max_algorithms,
            });
        }
        if self.algorithms.iter().any(|id| id.len() > MAX_IDENTIFIER_LEN) {
            return Err(ValidationError::FieldTooLong {
                field: "algorithm identifier".to_string(),
                max_length: MAX_IDENTIFIER_LEN,
            });
        }
        if self.array.len() > config.max_elements {
            return Err(ValidationError::TooManyElements {
                actual: self.array.len(),
                max: config.max_elements,
            });
        }
        ensure_comparable(&self.array)
    }
}
