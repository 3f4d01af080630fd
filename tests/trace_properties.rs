use std::cmp::Ordering;

use proptest::prelude::*;

use sortrace::{Algorithm, Number, Step};

/// A record ordered by `key` only, so ties are observable through `tag`.
#[derive(Debug, Clone)]
struct Keyed {
    key: i32,
    tag: usize,
}

impl PartialEq for Keyed {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl PartialOrd for Keyed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.key.partial_cmp(&other.key)
    }
}

fn keyed(keys: &[i32]) -> Vec<Keyed> {
    keys.iter()
        .enumerate()
        .map(|(tag, &key)| Keyed { key, tag })
        .collect()
}

fn is_non_decreasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

#[test]
fn stable_algorithms_keep_equal_keys_in_order() {
    let input = vec![(5, "a"), (5, "b"), (3, "c")];
    let records: Vec<Keyed> = keyed(&input.iter().map(|(k, _)| *k).collect::<Vec<_>>());

    for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_stable()) {
        let outcome = algorithm.sort(&records).unwrap();
        let labels: Vec<&str> = outcome.sorted.iter().map(|r| input[r.tag].1).collect();
        assert_eq!(labels, vec!["c", "a", "b"], "{algorithm} reordered equal keys");
    }
}

#[test]
fn reference_input_scenarios() {
    let input: Vec<Number> = [5, 3, 8, 1].into_iter().map(Number::Int).collect();
    let expected: Vec<Number> = [1, 3, 5, 8].into_iter().map(Number::Int).collect();

    for algorithm in Algorithm::ALL {
        let outcome = algorithm.sort(&input).unwrap();
        assert_eq!(outcome.sorted, expected, "{algorithm}");
    }

    let quick = Algorithm::Quick.sort(&input).unwrap();
    let first_pivot = quick.trace.iter().position(|s| matches!(s, Step::Pivot(_))).unwrap();
    assert_eq!(quick.trace.steps()[first_pivot], Step::Pivot(3));

    // State after the first partition pass: replay up to the second Partition.
    let second_partition = quick
        .trace
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s, Step::Partition(..)))
        .nth(1)
        .map(|(i, _)| i)
        .unwrap();
    let prefix = sortrace::Trace::from_steps(quick.trace.steps()[..second_partition].to_vec());
    let after_first_pass = prefix.replay(&input).unwrap();
    let expected_pass: Vec<Number> = [1, 3, 8, 5].into_iter().map(Number::Int).collect();
    assert_eq!(after_first_pass, expected_pass);
}

proptest! {
    #[test]
    fn output_is_sorted_permutation(values in proptest::collection::vec(-1000i64..1000, 0..64)) {
        let input: Vec<Number> = values.iter().copied().map(Number::Int).collect();
        let mut expected = values.clone();
        expected.sort_unstable();
        let expected: Vec<Number> = expected.into_iter().map(Number::Int).collect();

        for algorithm in Algorithm::ALL {
            let outcome = algorithm.sort(&input).unwrap();
            prop_assert!(is_non_decreasing(&outcome.sorted));
            prop_assert_eq!(&outcome.sorted, &expected);
        }
    }

    #[test]
    fn replaying_mutations_reproduces_output(values in proptest::collection::vec(-50i64..50, 0..48)) {
        let input: Vec<Number> = values.into_iter().map(Number::Int).collect();
        for algorithm in Algorithm::ALL {
            let outcome = algorithm.sort(&input).unwrap();
            let replayed = outcome.trace.replay(&input).unwrap();
            prop_assert_eq!(replayed, outcome.sorted);
        }
    }

    #[test]
    fn traces_satisfy_structural_invariants(values in proptest::collection::vec(-20i64..20, 0..48)) {
        let input: Vec<Number> = values.into_iter().map(Number::Int).collect();
        for algorithm in Algorithm::ALL {
            let outcome = algorithm.sort(&input).unwrap();
            prop_assert!(outcome.trace.audit(input.len()).is_ok(), "{} produced a malformed trace", algorithm);
            prop_assert!(outcome.trace.len() <= algorithm.max_steps(input.len()));
        }
    }

    #[test]
    fn sorted_input_needs_no_mutation(mut values in proptest::collection::vec(-100i64..100, 0..48)) {
        values.sort_unstable();
        let input: Vec<Number> = values.into_iter().map(Number::Int).collect();

        for algorithm in Algorithm::ALL {
            let outcome = algorithm.sort(&input).unwrap();
            prop_assert_eq!(&outcome.sorted, &input);
            prop_assert_eq!(outcome.trace.stats().swaps, 0);

            // Merge sort still writes every element back; each write is a no-op.
            let mut state = input.clone();
            for step in &outcome.trace {
                if let Step::Place(index, value) = step {
                    prop_assert_eq!(&state[*index], value);
                    state[*index] = *value;
                }
            }
        }
    }

    #[test]
    fn stable_algorithms_match_std_stable_sort(keys in proptest::collection::vec(0i32..6, 0..40)) {
        let records = keyed(&keys);
        let mut expected = records.clone();
        expected.sort_by_key(|r| r.key);
        let expected_tags: Vec<usize> = expected.iter().map(|r| r.tag).collect();

        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_stable()) {
            let outcome = algorithm.sort(&records).unwrap();
            let tags: Vec<usize> = outcome.sorted.iter().map(|r| r.tag).collect();
            prop_assert_eq!(&tags, &expected_tags);
        }
    }

    #[test]
    fn identical_input_gives_identical_trace(values in proptest::collection::vec(-100i64..100, 0..32)) {
        let input: Vec<Number> = values.into_iter().map(Number::Int).collect();
        for algorithm in Algorithm::ALL {
            let a = algorithm.sort(&input).unwrap();
            let b = algorithm.sort(&input).unwrap();
            prop_assert_eq!(a.trace.digest().unwrap(), b.trace.digest().unwrap());
        }
    }

    #[test]
    fn mixed_values_beyond_float_precision_sort(offsets in proptest::collection::vec((0i64..8, any::<bool>()), 0..24)) {
        const BASE: i64 = 9_007_199_254_740_992;
        #[allow(clippy::cast_precision_loss)]
        let input: Vec<Number> = offsets
            .into_iter()
            .map(|(offset, as_float)| {
                if as_float {
                    Number::Float((BASE + offset) as f64)
                } else {
                    Number::Int(BASE + offset)
                }
            })
            .collect();
        for algorithm in Algorithm::ALL {
            let outcome = algorithm.sort(&input).unwrap();
            prop_assert!(is_non_decreasing(&outcome.sorted), "{} produced {:?}", algorithm, outcome.sorted);
        }
    }

    #[test]
    fn mixed_integers_and_floats_sort(values in proptest::collection::vec(-1.0e6f64..1.0e6, 0..32), ints in proptest::collection::vec(-1000i64..1000, 0..32)) {
        let input: Vec<Number> = values
            .into_iter()
            .map(Number::Float)
            .chain(ints.into_iter().map(Number::Int))
            .collect();
        for algorithm in Algorithm::ALL {
            let outcome = algorithm.sort(&input).unwrap();
            prop_assert!(is_non_decreasing(&outcome.sorted));
            prop_assert_eq!(outcome.sorted.len(), input.len());
        }
    }
}
