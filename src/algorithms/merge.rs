//! Top-down merge sort.
//!
//! All intermediate merges happen in a private working buffer. The caller's
//! slice is written exactly once, after the outermost merge has finished,
//! so a partially merged state is never visible through it.

use crate::trace::Trace;

/// Sorts `data`, recording every divide, compare and placement.
pub fn sort<T: PartialOrd + Clone>(data: &mut [T], trace: &mut Trace<T>) {
    if data.len() < 2 {
        return;
    }

    let mut work = data.to_vec();
    let last = work.len() - 1;
    divide(&mut work, 0, last, trace);
    data.clone_from_slice(&work);
}

fn divide<T: PartialOrd + Clone>(work: &mut [T], start: usize, end: usize, trace: &mut Trace<T>) {
    if start >= end {
        return;
    }

    let mid = start + (end - start) / 2;
    trace.divide(start, end, mid);
    divide(work, start, mid, trace);
    divide(work, mid + 1, end, trace);
    merge(work, start, mid, end, trace);
}

/// Merges the sorted runs `[start, mid]` and `[mid + 1, end]`.
///
/// Ties go to the left run, which keeps the sort stable.
fn merge<T: PartialOrd + Clone>(work: &mut [T], start: usize, mid: usize, end: usize, trace: &mut Trace<T>) {
    trace.merge(start, mid, end);

    let left = work[start..=mid].to_vec();
    let right = work[mid + 1..=end].to_vec();

    let (mut i, mut j, mut k) = (0, 0, start);
    while i < left.len() && j < right.len() {
        trace.compare(start + i, mid + 1 + j);
        let next = if left[i] <= right[j] {
            i += 1;
            &left[i - 1]
        } else {
            j += 1;
            &right[j - 1]
        };
        work[k] = next.clone();
        trace.place(k, next.clone());
        k += 1;
    }

    for value in left[i..].iter().chain(&right[j..]) {
        work[k] = value.clone();
        trace.place(k, value.clone());
        k += 1;
    }

    trace.merge_complete(start, end);
}
