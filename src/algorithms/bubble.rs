//! Bubble sort.

use crate::trace::Trace;

/// Sweeps adjacent pairs up to the unsorted boundary, swapping on strict `>`.
///
/// Runs all `n` passes (no early exit). Equal elements are never swapped, so
/// the sort is stable.
pub fn sort<T: PartialOrd>(data: &mut [T], trace: &mut Trace<T>) {
    let n = data.len();
    for i in 0..n {
        for j in 0..n - i - 1 {
            trace.compare(j, j + 1);
            if data[j] > data[j + 1] {
                data.swap(j, j + 1);
                trace.swap(j, j + 1);
            }
        }
    }
}
