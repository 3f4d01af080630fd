//! Append-only step traces.
//!
//! A [`Trace`] is produced by exactly one sort invocation and handed to the
//! caller by value when the sort returns. Append order is replay order.

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{SortError, SortResult, TransportError, ValidationError};
use crate::step::Step;
use crate::value::Number;

/// Ordered record of every primitive event of one sort invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace<T = Number> {
    steps: Vec<Step<T>>,
}

/// Per-kind step counts of a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStats {
    pub compares: usize,
    pub swaps: usize,
    pub places: usize,
    pub divides: usize,
    pub partitions: usize,
    pub pivots: usize,
    pub merges: usize,
    pub merge_completes: usize,
}

impl TraceStats {
    /// Number of array-changing events.
    #[must_use]
    pub const fn mutations(&self) -> usize {
        self.swaps + self.places
    }
}

impl<T> Default for Trace<T> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<T> Trace<T> {
    /// Creates an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing step sequence, e.g. one received over the wire.
    #[must_use]
    pub fn from_steps(steps: Vec<Step<T>>) -> Self {
        Self { steps }
    }

    pub(crate) fn compare(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b, "compare operands must differ");
        self.steps.push(Step::Compare(a, b));
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b, "swap operands must differ");
        self.steps.push(Step::Swap(a, b));
    }

    pub(crate) fn place(&mut self, index: usize, value: T) {
        self.steps.push(Step::Place(index, value));
    }

    pub(crate) fn divide(&mut self, start: usize, end: usize, mid: usize) {
        self.steps.push(Step::Divide(start, end, mid));
    }

    pub(crate) fn partition(&mut self, low: usize, high: usize) {
        self.steps.push(Step::Partition(low, high));
    }

    pub(crate) fn pivot(&mut self, index: usize) {
        self.steps.push(Step::Pivot(index));
    }

    pub(crate) fn merge(&mut self, start: usize, mid: usize, end: usize) {
        self.steps.push(Step::Merge(start, mid, end));
    }

    pub(crate) fn merge_complete(&mut self, start: usize, end: usize) {
        self.steps.push(Step::MergeComplete(start, end));
    }

    /// The recorded steps, in replay order.
    #[must_use]
    pub fn steps(&self) -> &[Step<T>] {
        &self.steps
    }

    /// Consumes the trace, returning its steps.
    #[must_use]
    pub fn into_steps(self) -> Vec<Step<T>> {
        self.steps
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the recorded steps.
    pub fn iter(&self) -> std::slice::Iter<'_, Step<T>> {
        self.steps.iter()
    }

    /// Counts steps per kind.
    #[must_use]
    pub fn stats(&self) -> TraceStats {
        let mut stats = TraceStats::default();
        for step in &self.steps {
            match step {
                Step::Compare(..) => stats.compares += 1,
                Step::Swap(..) => stats.swaps += 1,
                Step::Place(..) => stats.places += 1,
                Step::Divide(..) => stats.divides += 1,
                Step::Partition(..) => stats.partitions += 1,
                Step::Pivot(_) => stats.pivots += 1,
                Step::Merge(..) => stats.merges += 1,
                Step::MergeComplete(..) => stats.merge_completes += 1,
            }
        }
        stats
    }

    /// Checks the structural invariants of the trace against an array of
    /// length `len`.
    ///
    /// - every index is in bounds
    /// - `Compare` and `Swap` reference two distinct indices
    /// - `Divide`, `Partition` and `Merge` describe non-degenerate ranges
    /// - every `MergeComplete(start, end)` closes an earlier open `Merge(start, _, end)`
    pub fn audit(&self, len: usize) -> Result<(), ValidationError> {
        let mut open_merges: Vec<(usize, usize)> = Vec::new();

        for (position, step) in self.steps.iter().enumerate() {
            let malformed = |reason: String| ValidationError::MalformedTrace { position, reason };

            if let Some(index) = step.indices().into_iter().find(|&i| i >= len) {
                return Err(malformed(format!(
                    "{} index {index} out of bounds for length {len}",
                    step.kind().as_str()
                )));
            }

            match *step {
                Step::Compare(a, b) | Step::Swap(a, b) if a == b => {
                    return Err(malformed(format!(
                        "{} references index {a} twice",
                        step.kind().as_str()
                    )));
                }
                Step::Divide(start, end, mid) if !(start <= mid && mid < end) => {
                    return Err(malformed(format!("divide({start}, {end}, {mid}) is degenerate")));
                }
                Step::Partition(low, high) if low >= high => {
                    return Err(malformed(format!("partition({low}, {high}) is degenerate")));
                }
                Step::Merge(start, mid, end) => {
                    if !(start <= mid && mid < end) {
                        return Err(malformed(format!("merge({start}, {mid}, {end}) is degenerate")));
                    }
                    open_merges.push((start, end));
                }
                Step::MergeComplete(start, end) => {
                    let Some(open) = open_merges.iter().rposition(|&r| r == (start, end)) else {
                        return Err(malformed(format!(
                            "mergeComplete({start}, {end}) has no open merge"
                        )));
                    };
                    open_merges.remove(open);
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl<T: Clone> Trace<T> {
    /// Applies the recorded `Swap` and `Place` events, in order, to a copy
    /// of `input` and returns the result.
    pub fn replay(&self, input: &[T]) -> Result<Vec<T>, ValidationError> {
        let mut out = input.to_vec();
        let len = out.len();

        for (position, step) in self.steps.iter().enumerate() {
            match step {
                Step::Swap(a, b) => {
                    if *a >= len || *b >= len {
                        return Err(ValidationError::MalformedTrace {
                            position,
                            reason: format!("swap({a}, {b}) out of bounds for length {len}"),
                        });
                    }
                    out.swap(*a, *b);
                }
                Step::Place(index, value) => {
                    let Some(slot) = out.get_mut(*index) else {
                        return Err(ValidationError::MalformedTrace {
                            position,
                            reason: format!("place({index}) out of bounds for length {len}"),
                        });
                    };
                    *slot = value.clone();
                }
                _ => {}
            }
        }

        Ok(out)
    }
}

impl<T: Serialize> Trace<T> {
    /// BLAKE3 digest of the canonical JSON encoding of every step.
    ///
    /// Sorting is deterministic, so equal inputs give equal digests.
    pub fn digest(&self) -> SortResult<blake3::Hash> {
        let mut hasher = Hasher::new();
        for step in &self.steps {
            let bytes = serde_json::to_vec(step).map_err(|e| {
                SortError::Transport(TransportError::SerializationFailed {
                    message: format!("serialize step: {e}"),
                })
            })?;
            hasher.update(&bytes);
            hasher.update(b"\n");
        }
        Ok(hasher.finalize())
    }
}

impl<'a, T> IntoIterator for &'a Trace<T> {
    type Item = &'a Step<T>;
    type IntoIter = std::slice::Iter<'a, Step<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
