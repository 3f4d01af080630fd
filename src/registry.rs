//! Identifier-to-algorithm mapping used by the dispatch layer.
//!
//! The sort engines themselves never consult the registry.

use serde::{Deserialize, Serialize};

use crate::algorithms::Algorithm;
use crate::error::ExecutionError;

/// Descriptive metadata for one algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub time_complexity: String,
    pub space_complexity: String,
    pub stable: bool,
}

impl AlgorithmInfo {
    fn describe(algorithm: Algorithm) -> Self {
        let (name, description, time, space) = match algorithm {
            Algorithm::Bubble => (
                "Bubble Sort",
                "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
                "O(n²)",
                "O(1)",
            ),
            Algorithm::Selection => (
                "Selection Sort",
                "Repeatedly selects the minimum of the unsorted suffix and moves it to the end of the sorted prefix.",
                "O(n²)",
                "O(1)",
            ),
            Algorithm::Insertion => (
                "Insertion Sort",
                "Builds the sorted prefix one element at a time by moving each new element left past larger ones.",
                "O(n²)",
                "O(1)",
            ),
            Algorithm::Quick => (
                "Quick Sort",
                "Partitions the range around its last element, then sorts both sides of the pivot.",
                "O(n log n) average, O(n²) worst",
                "O(log n) average, O(n) worst",
            ),
            Algorithm::Merge => (
                "Merge Sort",
                "Splits the range in half, sorts both halves and merges them back together.",
                "O(n log n)",
                "O(n)",
            ),
        };

        Self {
            id: algorithm.id().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            time_complexity: time.to_string(),
            space_complexity: space.to_string(),
            stable: algorithm.is_stable(),
        }
    }
}

/// The set of algorithms a dispatcher will run.
///
/// The default registry enables all five. Identifiers that are unknown or
/// disabled resolve to [`ExecutionError::UnsupportedAlgorithm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmRegistry {
    enabled: Vec<Algorithm>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self {
            enabled: Algorithm::ALL.to_vec(),
        }
    }
}

impl AlgorithmRegistry {
    /// Creates a registry with only the given algorithms enabled.
    ///
    /// Duplicates are ignored; catalog order follows [`Algorithm::ALL`].
    #[must_use]
    pub fn with_algorithms(algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        let requested: Vec<Algorithm> = algorithms.into_iter().collect();
        let enabled = Algorithm::ALL
            .into_iter()
            .filter(|a| requested.contains(a))
            .collect();
        Self { enabled }
    }

    /// Looks up an identifier.
    pub fn resolve(&self, id: &str) -> Result<Algorithm, ExecutionError> {
        let algorithm: Algorithm = id.parse()?;
        if self.enabled.contains(&algorithm) {
            Ok(algorithm)
        } else {
            Err(ExecutionError::UnsupportedAlgorithm { name: id.to_string() })
        }
    }

    /// Returns true if `id` names an enabled algorithm.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_ok()
    }

    /// Identifiers of the enabled algorithms.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&'static str> {
        self.enabled.iter().map(|a| a.id()).collect()
    }

    /// The enabled algorithms.
    #[must_use]
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.enabled
    }

    /// Descriptive metadata for every enabled algorithm.
    #[must_use]
    pub fn catalog(&self) -> Vec<AlgorithmInfo> {
        self.enabled.iter().copied().map(AlgorithmInfo::describe).collect()
    }
}
