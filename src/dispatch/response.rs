//! Batch response types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::algorithms::SortOutcome;
use crate::error::ExecutionError;
use crate::step::Step;
use crate::value::Number;

/// Placeholder `time_taken` for algorithms that did not run.
pub const TIME_NOT_AVAILABLE: &str = "N/A";

/// Why a requested algorithm produced no trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The identifier is unknown or disabled.
    Unsupported,
}

/// Per-algorithm entry of a [`BatchResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlgorithmResult {
    /// The sort ran to completion.
    Completed {
        steps: Vec<Step>,
        sorted_output: Vec<Number>,
        /// Elapsed milliseconds, two decimals.
        time_taken: String,
    },
    /// The sort did not run.
    Failed {
        error: FailureKind,
        message: String,
        time_taken: String,
    },
}

impl AlgorithmResult {
    /// Wraps a finished sort.
    #[must_use]
    pub fn completed(outcome: SortOutcome) -> Self {
        Self::Completed {
            time_taken: format!("{:.2}", outcome.elapsed_ms),
            sorted_output: outcome.sorted,
            steps: outcome.trace.into_steps(),
        }
    }

    /// Reports an identifier that could not be resolved.
    #[must_use]
    pub fn unsupported(err: &ExecutionError) -> Self {
        Self::Failed {
            error: FailureKind::Unsupported,
            message: err.to_string(),
            time_taken: TIME_NOT_AVAILABLE.to_string(),
        }
    }

    /// Returns true if the sort ran.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Recorded steps, if the sort ran.
    #[must_use]
    pub fn steps(&self) -> Option<&[Step]> {
        match self {
            Self::Completed { steps, .. } => Some(steps),
            Self::Failed { .. } => None,
        }
    }

    /// Sorted values, if the sort ran.
    #[must_use]
    pub fn sorted_output(&self) -> Option<&[Number]> {
        match self {
            Self::Completed { sorted_output, .. } => Some(sorted_output),
            Self::Failed { .. } => None,
        }
    }

    /// Failure kind, if the sort did not run.
    #[must_use]
    pub const fn failure(&self) -> Option<FailureKind> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { error, .. } => Some(*error),
        }
    }
}

/// Results of one batch request, keyed by requested identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// ID of the request this answers.
    pub request_id: Uuid,

    /// When the last algorithm finished.
    pub completed_at: DateTime<Utc>,

    /// One entry per distinct requested identifier.
    pub results: BTreeMap<String, AlgorithmResult>,
}

impl BatchResponse {
    /// Creates a response stamped with the current time.
    #[must_use]
    pub fn new(request_id: Uuid, results: BTreeMap<String, AlgorithmResult>) -> Self {
        Self {
            request_id,
            completed_at: Utc::now(),
            results,
        }
    }

    /// Looks up the entry for an identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AlgorithmResult> {
        self.results.get(id)
    }

    /// Number of entries that completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.results.values().filter(|r| r.is_completed()).count()
    }
}
