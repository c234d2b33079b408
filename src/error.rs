use std::ops::{Bound, RangeBounds};
use thiserror::Error;

/// Errors returned by [`IndexedList`](crate::IndexedList), its views and its cursors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// An index fell outside the interval accepted by the operation.
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A range was reversed or reached past the end of the list.
    #[error("range {start}..{end} is out of bounds for length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    /// An operation that must produce an element was called on an empty list.
    #[error("the list is empty")]
    Empty,

    /// The list was structurally modified behind a cursor or a view.
    #[error("structure changed outside this cursor or view (expected version {expected}, found {actual})")]
    Conflict { expected: u64, actual: u64 },

    /// A cursor was used with a list other than the one that created it.
    #[error("the cursor belongs to a different list")]
    ForeignCursor,

    /// A cursor was asked to remove or replace an element without having
    /// returned one since its last structural change.
    #[error("the cursor has no current element")]
    NoCurrentElement,

    /// The structural health check found a broken invariant.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// The invariant that [`IndexedList::check_invariants`](crate::IndexedList::check_invariants)
/// found broken, with the offending positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("walking the chain from head reached {walked} nodes, but the length is {len}")]
    LengthMismatch { walked: usize, len: usize },

    #[error("node at index {index} does not link back to its predecessor")]
    BrokenBackLink { index: usize },

    #[error("the tail link does not point at the last node of the chain")]
    TailMismatch,

    #[error("the arena holds {occupied} nodes, but the length is {len}")]
    ArenaLeak { occupied: usize, len: usize },

    #[error("the sentinel finger has index {index}, but the length is {len}")]
    SentinelIndex { index: usize, len: usize },

    #[error("the sentinel finger references a node")]
    SentinelNode,

    #[error("{actual} fingers are in use, but the policy requires {expected}")]
    FingerCount { expected: usize, actual: usize },

    #[error("finger {slot} has index {index}, not greater than its predecessor's {previous}")]
    UnsortedFingers {
        slot: usize,
        previous: usize,
        index: usize,
    },

    #[error("finger {slot} has index {index}, which is out of bounds for length {len}")]
    FingerOutOfBounds { slot: usize, index: usize, len: usize },

    #[error("finger {slot} claims index {index}, but references a different node")]
    FingerNodeMismatch { slot: usize, index: usize },
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), ListError> {
    if index < len {
        Ok(())
    } else {
        Err(ListError::IndexOutOfBounds { index, len })
    }
}

pub(crate) fn check_position(index: usize, len: usize) -> Result<(), ListError> {
    if index <= len {
        Ok(())
    } else {
        Err(ListError::IndexOutOfBounds { index, len })
    }
}

/// Resolve `range` against a sequence of `len` elements into `start..end`.
pub(crate) fn check_range<R: RangeBounds<usize>>(
    range: R,
    len: usize,
) -> Result<(usize, usize), ListError> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    if start > end || end > len {
        return Err(ListError::RangeOutOfBounds { start, end, len });
    }
    Ok((start, end))
}
