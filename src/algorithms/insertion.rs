//! Insertion sort.

use crate::trace::Trace;

/// Moves each element left past every strictly greater predecessor.
///
/// Each shift is an adjacent exchange, so the key is already in place when
/// the scan stops; the stop itself records nothing. Strict `<` keeps the
/// sort stable.
pub fn sort<T: PartialOrd>(data: &mut [T], trace: &mut Trace<T>) {
    for i in 1..data.len() {
        let mut j = i;
        while j > 0 {
            trace.compare(j - 1, j);
            if data[j] < data[j - 1] {
                data.swap(j - 1, j);
                trace.swap(j - 1, j);
                j -= 1;
            } else {
                break;
            }
        }
    }
}
