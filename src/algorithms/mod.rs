//! The five step-recording sort engines.
//!
//! Each engine sorts a slice in place and appends to a caller-provided
//! [`Trace`]. [`Algorithm::sort`] wraps that in copy-in/copy-out: it
//! validates the input, sorts a private copy, and returns the sorted copy
//! together with the trace. The caller's data is never mutated.

pub mod bubble;
pub mod insertion;
pub mod merge;
pub mod quick;
pub mod selection;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{ExecutionError, SortResult, ValidationError};
use crate::trace::Trace;
use crate::value::Number;

/// A sort engine variant, identified on the wire by its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
}

impl Algorithm {
    /// Every variant, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Quick,
        Self::Merge,
    ];

    /// Stable identifier used by the dispatch layer.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Insertion => "insertion",
            Self::Quick => "quick",
            Self::Merge => "merge",
        }
    }

    /// Whether equal elements keep their relative order.
    #[must_use]
    pub const fn is_stable(self) -> bool {
        matches!(self, Self::Bubble | Self::Insertion | Self::Merge)
    }

    /// Whether the algorithm is quadratic on every input shape.
    #[must_use]
    pub const fn is_elementary(self) -> bool {
        matches!(self, Self::Bubble | Self::Selection | Self::Insertion)
    }

    /// Upper bound on the steps recorded when sorting `len` elements.
    ///
    /// The bound holds for every input order, including the quadratic worst
    /// case of quicksort's fixed pivot.
    #[must_use]
    pub const fn max_steps(self, len: usize) -> usize {
        if len < 2 {
            return 0;
        }
        let pairs = len.saturating_mul(len - 1) / 2;
        // One partition, pivot and final swap, or one divide, merge and
        // merge-complete, per internal node of the recursion.
        let per_node = (len - 1).saturating_mul(3);
        match self {
            Self::Bubble | Self::Insertion => pairs.saturating_mul(2),
            Self::Selection => pairs.saturating_add(len - 1),
            Self::Quick => pairs.saturating_mul(2).saturating_add(per_node),
            Self::Merge => {
                let depth = (usize::BITS - (len - 1).leading_zeros()) as usize;
                len.saturating_mul(depth)
                    .saturating_mul(2)
                    .saturating_add(per_node)
            }
        }
    }

    /// Sorts `data` in place, appending every step to `trace`.
    ///
    /// No validation happens here; see [`Algorithm::sort`].
    pub fn run<T: PartialOrd + Clone>(self, data: &mut [T], trace: &mut Trace<T>) {
        match self {
            Self::Bubble => bubble::sort(data, trace),
            Self::Selection => selection::sort(data, trace),
            Self::Insertion => insertion::sort(data, trace),
            Self::Quick => quick::sort(data, trace),
            Self::Merge => merge::sort(data, trace),
        }
    }

    /// Sorts a private copy of `input` and returns it with its trace.
    ///
    /// Fails with [`ValidationError::NonComparable`] before recording
    /// anything if some element is outside the total order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortrace::{Algorithm, Step};
    ///
    /// let outcome = Algorithm::Bubble.sort(&[5, 3, 8, 1]).unwrap();
    /// assert_eq!(outcome.sorted, vec![1, 3, 5, 8]);
    /// assert_eq!(outcome.trace.steps()[1], Step::Swap(0, 1));
    /// ```
    pub fn sort<T: PartialOrd + Clone>(self, input: &[T]) -> SortResult<SortOutcome<T>> {
        ensure_comparable(input)?;

        let started = Instant::now();
        let mut sorted = input.to_vec();
        let mut trace = Trace::new();
        self.run(&mut sorted, &mut trace);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        tracing::debug!(
            algorithm = self.id(),
            len = sorted.len(),
            steps = trace.len(),
            elapsed_ms,
            "sort completed"
        );

        Ok(SortOutcome {
            sorted,
            trace,
            elapsed_ms,
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| ExecutionError::UnsupportedAlgorithm { name: s.to_string() })
    }
}

/// Result of one completed sort invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortOutcome<T = Number> {
    /// The input's elements in non-decreasing order.
    #[serde(rename = "sorted_output")]
    pub sorted: Vec<T>,

    /// Every step, in replay order.
    pub trace: Trace<T>,

    /// Wall-clock duration of the run. Informational only.
    #[serde(rename = "elapsed_millis")]
    pub elapsed_ms: f64,
}

/// Rejects input containing an element outside the total order.
///
/// An element is accepted when it compares with itself and with the first
/// element; for numbers this rejects exactly `NaN`.
pub fn ensure_comparable<T: PartialOrd>(input: &[T]) -> Result<(), ValidationError> {
    let Some(first) = input.first() else {
        return Ok(());
    };
    for (index, value) in input.iter().enumerate() {
        if value.partial_cmp(value).is_none() || first.partial_cmp(value).is_none() {
            return Err(ValidationError::NonComparable { index });
        }
    }
    Ok(())
}
