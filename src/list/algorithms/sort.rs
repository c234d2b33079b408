use crate::list::IndexedList;
use crate::{Iter, IterMut};
use std::cmp::Ordering;
use std::mem;

impl<T> IndexedList<T> {
    /// Stable sort of the elements in `from..to`.
    ///
    /// The elements are ranked through a buffer of references, then moved
    /// between the nodes of the range in place, so no node is relinked and
    /// every finger keeps pointing at a live node of the range. The fingers
    /// over the range are re-spaced afterwards.
    pub(crate) fn sort_range<F>(&mut self, from: usize, to: usize, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = to - from;
        if len < 2 {
            return;
        }
        let first = self.node_mut(from);
        let last = self.chain.walk_forward(first, len - 1);

        let order = {
            let elements: Vec<&T> = Iter::range(&self.chain, Some(first), Some(last), len).collect();
            let mut order: Vec<usize> = (0..len).collect();
            order.sort_by(|&a, &b| compare(elements[a], elements[b]));
            order
        };
        let mut slots: Vec<&mut T> =
            IterMut::range(&mut self.chain, Some(first), Some(last), len).collect();
        permute(&mut slots, order);

        self.bump_version();
        self.distribute_fingers(from, to);
    }
}

/// Rearrange the values behind `slots` so that slot `i` receives the value
/// that was in slot `order[i]`.
fn permute<T>(slots: &mut [&mut T], mut order: Vec<usize>) {
    for start in 0..order.len() {
        let mut current = start;
        while order[current] != start {
            let source = order[current];
            swap_values(slots, current, source);
            order[current] = current;
            current = source;
        }
        order[current] = current;
    }
}

fn swap_values<T>(slots: &mut [&mut T], a: usize, b: usize) {
    let (low, high) = (a.min(b), a.max(b));
    let (left, right) = slots.split_at_mut(high);
    mem::swap(&mut *left[low], &mut *right[0]);
}
