//! Error types for sortrace.
//!
//! All errors are strongly typed using thiserror so callers can pattern
//! match on the specific condition instead of parsing messages.

use thiserror::Error;

/// Input validation errors (the "invalid input" family).
///
/// These are raised before any step is recorded: a sort either runs to
/// completion or fails with one of these and produces no trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input is not a sequence")]
    NotASequence,

    #[error("Element at index {index} is not a number")]
    NonNumericElement {
        index: usize,
    },

    #[error("Element at index {index} is not comparable with the other elements")]
    NonComparable {
        index: usize,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Invalid JSON format: {reason}")]
    InvalidJson {
        reason: String,
    },

    #[error("Input has {actual} elements, maximum is {max}")]
    TooManyElements {
        actual: usize,
        max: usize,
    },

    #[error("Worst-case trace of {bound} steps exceeds the limit of {max}")]
    TraceTooLarge {
        bound: usize,
        max: usize,
    },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        field: String,
        max_length: usize,
    },

    #[error("Malformed trace at step {position}: {reason}")]
    MalformedTrace {
        position: usize,
        reason: String,
    },
}

/// Errors raised while executing or scheduling a sort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Unsupported algorithm: {name}")]
    UnsupportedAlgorithm {
        name: String,
    },

    #[error("Execution queue is full for lane '{lane}' (capacity: {capacity})")]
    QueueFull {
        lane: String,
        capacity: usize,
    },

    #[error("Execution lane '{lane}' is disconnected")]
    Disconnected {
        lane: String,
    },

    #[error("Operation timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },
}

/// Errors at the wire boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Failed to serialize response: {message}")]
    SerializationFailed {
        message: String,
    },

    #[error("Failed to deserialize request: {message}")]
    DeserializationFailed {
        message: String,
    },
}

/// Top-level error type for sortrace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl SortError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if resubmitting the same request may succeed.
    ///
    /// Sorting is deterministic, so only scheduler back-pressure qualifies.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Execution(ExecutionError::QueueFull { .. }))
    }
}

/// Result type alias for sortrace operations.
pub type SortResult<T> = Result<T, SortError>;
