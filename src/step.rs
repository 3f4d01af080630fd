//! The closed vocabulary of trace events.
//!
//! Every algorithm in this crate reports its work using exactly these kinds.
//! Only [`Step::Swap`] and [`Step::Place`] change the array; every other kind
//! is bookkeeping for the replaying consumer.

use serde::{Deserialize, Serialize};

use crate::value::Number;

/// One observable primitive event during a sort.
///
/// Serialized externally tagged with positional payloads, e.g.
/// `{"compare":[0,1]}` or `{"mergeComplete":[0,3]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step<T = Number> {
    /// Elements at these positions were compared.
    Compare(usize, usize),
    /// Elements at these positions exchanged places.
    Swap(usize, usize),
    /// `value` was written into `index`.
    Place(usize, T),
    /// The range `[start, end]` was split at `mid`.
    Divide(usize, usize, usize),
    /// The range `[start, end]` is about to be partitioned.
    Partition(usize, usize),
    /// The element at this index was chosen as pivot.
    Pivot(usize),
    /// Merging of `[start, mid]` and `[mid + 1, end]` began.
    Merge(usize, usize, usize),
    /// The merge of `[start, end]` finished.
    MergeComplete(usize, usize),
}

/// Discriminant of a [`Step`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    Compare,
    Swap,
    Place,
    Divide,
    Partition,
    Pivot,
    Merge,
    MergeComplete,
}

impl<T> Step<T> {
    /// Returns the kind of this step.
    #[must_use]
    pub const fn kind(&self) -> StepKind {
        match self {
            Self::Compare(..) => StepKind::Compare,
            Self::Swap(..) => StepKind::Swap,
            Self::Place(..) => StepKind::Place,
            Self::Divide(..) => StepKind::Divide,
            Self::Partition(..) => StepKind::Partition,
            Self::Pivot(_) => StepKind::Pivot,
            Self::Merge(..) => StepKind::Merge,
            Self::MergeComplete(..) => StepKind::MergeComplete,
        }
    }

    /// Returns true if replaying this step changes the array.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Swap(..) | Self::Place(..))
    }

    /// Every array index this step refers to.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        match self {
            Self::Compare(a, b)
            | Self::Swap(a, b)
            | Self::Partition(a, b)
            | Self::MergeComplete(a, b) => vec![*a, *b],
            Self::Place(i, _) | Self::Pivot(i) => vec![*i],
            Self::Divide(a, b, c) | Self::Merge(a, b, c) => vec![*a, *b, *c],
        }
    }
}

impl StepKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compare => "compare",
            Self::Swap => "swap",
            Self::Place => "place",
            Self::Divide => "divide",
            Self::Partition => "partition",
            Self::Pivot => "pivot",
            Self::Merge => "merge",
            Self::MergeComplete => "mergeComplete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_matches_replay_consumer() {
        let steps: Vec<Step> = vec![
            Step::Compare(0, 1),
            Step::Swap(0, 1),
            Step::Place(2, Number::Int(5)),
            Step::Divide(0, 3, 1),
            Step::Partition(0, 3),
            Step::Pivot(3),
            Step::Merge(0, 1, 3),
            Step::MergeComplete(0, 3),
        ];
        let json = serde_json::to_string(&steps).unwrap();
        assert_eq!(
            json,
            r#"[{"compare":[0,1]},{"swap":[0,1]},{"place":[2,5]},{"divide":[0,3,1]},{"partition":[0,3]},{"pivot":3},{"merge":[0,1,3]},{"mergeComplete":[0,3]}]"#
        );
    }

    #[test]
    fn decodes_wire_step_objects() {
        let step: Step = serde_json::from_str(r#"{"mergeComplete":[2,4]}"#).unwrap();
        assert_eq!(step, Step::MergeComplete(2, 4));
        let step: Step = serde_json::from_str(r#"{"place":[1,2.5]}"#).unwrap();
        assert_eq!(step, Step::Place(1, Number::Float(2.5)));
    }

    #[test]
    fn only_swap_and_place_mutate() {
        assert!(Step::<Number>::Swap(0, 1).is_mutation());
        assert!(Step::Place(0, Number::Int(1)).is_mutation());
        assert!(!Step::<Number>::Compare(0, 1).is_mutation());
        assert!(!Step::<Number>::MergeComplete(0, 1).is_mutation());
    }

    #[test]
    fn kind_names_match_wire_tags() {
        let step: Step = Step::MergeComplete(0, 1);
        assert_eq!(step.kind().as_str(), "mergeComplete");
        let json = serde_json::to_string(&StepKind::MergeComplete).unwrap();
        assert_eq!(json, "\"mergeComplete\"");
    }
}
