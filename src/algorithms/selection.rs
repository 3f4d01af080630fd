//! Selection sort.

use crate::trace::Trace;

/// Finds the minimum of the unsorted suffix and swaps it into position `i`.
///
/// At most one swap per position, and only when the minimum is elsewhere.
/// Not stable: the swap can carry an element past an equal one.
pub fn sort<T: PartialOrd>(data: &mut [T], trace: &mut Trace<T>) {
    let n = data.len();
    for i in 0..n {
        let mut min_index = i;
        for j in i + 1..n {
            trace.compare(min_index, j);
            if data[j] < data[min_index] {
                min_index = j;
            }
        }
        if min_index != i {
            data.swap(i, min_index);
            trace.swap(i, min_index);
        }
    }
}
