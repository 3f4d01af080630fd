//! Quicksort with Lomuto partitioning around the rightmost element.
//!
//! The pivot choice is fixed, so already-sorted input hits the quadratic
//! worst case. Ranges are processed from an explicit stack, left sub-range
//! first, which yields the same step order as the recursive formulation
//! without tying recursion depth to input length.

use crate::trace::Trace;

/// Sorts `data` in place, recording every compare, swap and partition.
pub fn sort<T: PartialOrd>(data: &mut [T], trace: &mut Trace<T>) {
    if data.len() < 2 {
        return;
    }

    let mut pending = vec![(0, data.len() - 1)];
    while let Some((low, high)) = pending.pop() {
        if low >= high {
            continue;
        }
        let pivot = partition(data, low, high, trace);
        // LIFO: push the right range first so the left one runs next.
        pending.push((pivot + 1, high));
        if pivot > low {
            pending.push((low, pivot - 1));
        }
    }
}

/// Partitions `[low, high]` and returns the pivot's final index.
fn partition<T: PartialOrd>(data: &mut [T], low: usize, high: usize, trace: &mut Trace<T>) -> usize {
    trace.partition(low, high);
    trace.pivot(high);

    // First slot of the region not yet known to be <= pivot.
    let mut boundary = low;
    for j in low..high {
        trace.compare(j, high);
        if data[j] <= data[high] {
            if boundary != j {
                data.swap(boundary, j);
                trace.swap(boundary, j);
            }
            boundary += 1;
        }
    }

    if boundary != high {
        data.swap(boundary, high);
        trace.swap(boundary, high);
    }
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Step;

    #[test]
    fn first_partition_moves_smallest_pivot_to_front() {
        let mut data = vec![5, 3, 8, 1];
        let mut trace = Trace::new();
        let pivot = partition(&mut data, 0, 3, &mut trace);

        assert_eq!(pivot, 0);
        assert_eq!(data, vec![1, 3, 8, 5]);
        assert_eq!(trace.steps()[0], Step::Partition(0, 3));
        assert_eq!(trace.steps()[1], Step::Pivot(3));
    }

    #[test]
    fn sorts_reference_input() {
        let mut data = vec![5, 3, 8, 1];
        let mut trace = Trace::new();
        sort(&mut data, &mut trace);

        assert_eq!(data, vec![1, 3, 5, 8]);
        assert_eq!(
            trace.steps(),
            &[
                Step::Partition(0, 3),
                Step::Pivot(3),
                Step::Compare(0, 3),
                Step::Compare(1, 3),
                Step::Compare(2, 3),
                Step::Swap(0, 3),
                Step::Partition(1, 3),
                Step::Pivot(3),
                Step::Compare(1, 3),
                Step::Compare(2, 3),
                Step::Swap(2, 3),
            ]
        );
    }

    #[test]
    fn no_op_swaps_are_suppressed() {
        let mut data = vec![1, 2, 3, 4];
        let mut trace = Trace::new();
        sort(&mut data, &mut trace);
        assert_eq!(trace.stats().swaps, 0);
        assert_eq!(trace.stats().pivots, 3);
    }

    #[test]
    fn left_range_is_finished_before_right_range() {
        let mut data = vec![2, 1, 0, 5, 4, 3];
        let mut trace = Trace::new();
        sort(&mut data, &mut trace);
        assert_eq!(data, vec![0, 1, 2, 3, 4, 5]);

        let partitions: Vec<_> = trace
            .iter()
            .filter_map(|s| match s {
                Step::Partition(l, h) => Some((*l, *h)),
                _ => None,
            })
            .collect();
        // Pivot 3 lands at index 3; [0, 2] is handled before [4, 5].
        assert_eq!(partitions[0], (0, 5));
        assert_eq!(partitions[1], (0, 2));
        assert_eq!(*partitions.last().unwrap(), (4, 5));
    }
}
