//! The finger index.
//!
//! A finger is a `(node, index)` pair caching the position of one node of the
//! chain. The [`FingerIndex`] keeps `ceil(sqrt(len))` of them sorted by index,
//! followed by a sentinel finger that references no node and whose index is
//! always the length of the list:
//!
//! ```text
//!   index:  0   1   2   3   4   5   6   7   8   9   (10)
//!   chain: [a]-[b]-[c]-[d]-[e]-[f]-[g]-[h]-[i]-[j]
//!           ↑           ↑           ↑       ↑        ↑
//! fingers: (a,0)       (d,3)       (g,6)   (i,8)   (-,10) sentinel
//! ```
//!
//! Locating an index then costs a binary search over the fingers plus a walk
//! bounded by the spacing between two fingers. Every mutation of the chain
//! goes through one of the upkeep methods here, so that once a list operation
//! returns, each finger's `index` is again the true position of its node.

use crate::list::node::{Chain, NodeId};
use log::{debug, trace};
use std::iter;

/// Smallest number of finger slots the storage keeps allocated.
pub(crate) const MIN_CAPACITY: usize = 8;

/// Number of fingers a list of `len` elements keeps: `ceil(sqrt(len))`.
///
/// # Examples
///
/// ```
/// use finger_list::recommended_fingers;
///
/// assert_eq!(recommended_fingers(0), 0);
/// assert_eq!(recommended_fingers(1), 1);
/// assert_eq!(recommended_fingers(3), 2);
/// assert_eq!(recommended_fingers(16), 4);
/// assert_eq!(recommended_fingers(17), 5);
/// ```
pub fn recommended_fingers(len: usize) -> usize {
    let mut root = (len as f64).sqrt() as usize;
    while root.saturating_mul(root) > len {
        root -= 1;
    }
    while (root + 1).saturating_mul(root + 1) <= len {
        root += 1;
    }
    if root * root == len {
        root
    } else {
        root + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Finger {
    pub(crate) node: Option<NodeId>,
    pub(crate) index: usize,
}

impl Finger {
    const EMPTY: Finger = Finger {
        node: None,
        index: 0,
    };

    pub(crate) fn new(node: NodeId, index: usize) -> Self {
        Self {
            node: Some(node),
            index,
        }
    }

    fn sentinel(len: usize) -> Self {
        Self {
            node: None,
            index: len,
        }
    }

    pub(crate) fn node_id(&self) -> NodeId {
        self.node.expect("the sentinel finger references no node")
    }

    /// Move the finger `steps` nodes towards the head.
    pub(crate) fn rewind_left<T>(&mut self, chain: &Chain<T>, steps: usize) {
        self.node = Some(chain.walk_backward(self.node_id(), steps));
        self.index -= steps;
    }

    /// Move the finger `steps` nodes towards the tail.
    pub(crate) fn rewind_right<T>(&mut self, chain: &Chain<T>, steps: usize) {
        self.node = Some(chain.walk_forward(self.node_id(), steps));
        self.index += steps;
    }

    fn move_to<T>(&mut self, chain: &Chain<T>, index: usize) {
        if index >= self.index {
            self.rewind_right(chain, index - self.index);
        } else {
            self.rewind_left(chain, self.index - index);
        }
    }
}

/// Sorted fingers into a [`Chain`], terminated by the sentinel.
///
/// The backing vector always holds `len() + 1` fingers; the last one is the
/// sentinel.
pub(crate) struct FingerIndex {
    fingers: Vec<Finger>,
}

impl FingerIndex {
    pub(crate) fn new() -> Self {
        let mut fingers = Vec::with_capacity(MIN_CAPACITY);
        fingers.push(Finger::sentinel(0));
        Self { fingers }
    }

    /// Number of real (non-sentinel) fingers.
    pub(crate) fn len(&self) -> usize {
        self.fingers.len() - 1
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.fingers.capacity()
    }

    /// All fingers, sentinel included.
    pub(crate) fn as_slice(&self) -> &[Finger] {
        &self.fingers
    }

    #[cfg(test)]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Finger] {
        &mut self.fingers
    }

    /// Slot of the first finger whose index is at least `target`. The
    /// sentinel guarantees a result for any `target <= len`.
    pub(crate) fn lower_bound(&self, target: usize) -> usize {
        self.fingers.partition_point(|finger| finger.index < target)
    }

    /// Slot of the finger ordinally closest to `target`; may be the sentinel.
    pub(crate) fn closest_finger(&self, target: usize) -> usize {
        let slot = self.lower_bound(target);
        if slot == 0 {
            return 0;
        }
        let right = self.fingers[slot].index - target;
        let left = target - self.fingers[slot - 1].index;
        if left <= right {
            slot - 1
        } else {
            slot
        }
    }

    /// Locate the node at `target`, lazily rebalancing the finger that
    /// serves the lookup.
    ///
    /// The finger `b` nearest to the target is first moved to the midpoint
    /// between its neighbours `a` and `c`; the walk then starts from
    /// whichever of the three is closest. Repeated lookups in one segment
    /// therefore spread its fingers out again, which keeps the cost
    /// *O*(√*n*) amortized.
    pub(crate) fn get_node<T>(&mut self, chain: &Chain<T>, target: usize) -> NodeId {
        let len = chain.len();
        debug_assert!(target < len);
        if self.len() < 3 {
            return chain.walk_to(target);
        }

        let slot = self.lower_bound(target);
        if slot < self.len() && self.fingers[slot].index == target {
            return self.fingers[slot].node_id();
        }

        if slot == 0 {
            // Before the first finger: either walk from the head or pull the
            // first finger down to the target.
            let first = &mut self.fingers[0];
            if target <= first.index - target {
                return chain.walk_to(target);
            }
            first.rewind_left(chain, first.index - target);
            return first.node_id();
        }

        if slot == self.len() {
            // After the last finger: the same, mirrored against the tail.
            let last = &mut self.fingers[slot - 1];
            let from_tail = len - 1 - target;
            if from_tail <= target - last.index {
                return chain.walk_to(target);
            }
            last.rewind_right(chain, target - last.index);
            return last.node_id();
        }

        // fingers[slot - 1].index < target < fingers[slot].index
        let mut b = self.closest_finger(target);
        if b == 0 {
            b = 1;
        }
        let (a, c) = (b - 1, b + 1);
        let midpoint = (self.fingers[a].index + self.fingers[c].index) / 2;
        self.fingers[b].move_to(chain, midpoint);

        let (a, b, c, c_is_sentinel) = (
            self.fingers[a],
            self.fingers[b],
            self.fingers[c],
            c == self.len(),
        );
        let from_a = target - a.index;
        let from_b = b.index.abs_diff(target);
        let from_c = c.index - target;
        if from_b <= from_a && from_b <= from_c {
            chain.walk(b.node_id(), b.index, target)
        } else if from_a <= from_c {
            chain.walk_forward(a.node_id(), from_a)
        } else if c_is_sentinel {
            chain.walk_backward(chain.back_node(), from_c - 1)
        } else {
            chain.walk_backward(c.node_id(), from_c)
        }
    }

    /// Add `delta` to the index of every finger from `slot` on, sentinel
    /// included.
    pub(crate) fn shift_right(&mut self, slot: usize, delta: usize) {
        for finger in &mut self.fingers[slot..] {
            finger.index += delta;
        }
    }

    /// Subtract `delta` from the index of every finger from `slot` on,
    /// sentinel included.
    pub(crate) fn shift_left(&mut self, slot: usize, delta: usize) {
        for finger in &mut self.fingers[slot..] {
            finger.index -= delta;
        }
    }

    /// Open `count` empty slots at `slot`, moving every finger at or past it
    /// `count` slots to the right. The storage doubles while it is too small.
    fn make_room(&mut self, slot: usize, count: usize) {
        let required = self.fingers.len() + count;
        if required > self.fingers.capacity() {
            let mut capacity = self.fingers.capacity().max(MIN_CAPACITY);
            while capacity < required {
                capacity *= 2;
            }
            trace!(
                "growing finger storage from {} to {} slots",
                self.fingers.capacity(),
                capacity
            );
            self.fingers.reserve_exact(capacity - self.fingers.len());
        }
        self.fingers
            .splice(slot..slot, iter::repeat(Finger::EMPTY).take(count));
    }

    /// Drop the fingers in `slot..slot + count`, halving the storage once it
    /// is less than a quarter full.
    fn remove_slots(&mut self, slot: usize, count: usize) {
        self.fingers.drain(slot..slot + count);
        let capacity = self.fingers.capacity();
        if capacity > MIN_CAPACITY && self.fingers.len() < capacity / 4 {
            let capacity = (capacity / 2).max(MIN_CAPACITY);
            trace!(
                "contracting finger storage from {} to {} slots",
                self.fingers.capacity(),
                capacity
            );
            self.fingers.shrink_to(capacity);
        }
    }

    /// Splice in fingers that sort between the neighbours of `slot`.
    fn insert_fingers(&mut self, slot: usize, fingers: &[Finger]) {
        self.make_room(slot, fingers.len());
        self.fingers[slot..slot + fingers.len()].copy_from_slice(fingers);
    }

    /// Finger upkeep after `node` was linked in at `index`.
    pub(crate) fn on_insert(&mut self, index: usize, node: NodeId, len: usize) {
        let slot = self.lower_bound(index);
        self.shift_right(slot, 1);
        if recommended_fingers(len) > self.len() {
            self.insert_fingers(slot, &[Finger::new(node, index)]);
        }
    }

    /// Finger upkeep before the node at `index` is unlinked. The chain must
    /// still contain that node.
    pub(crate) fn on_remove<T>(&mut self, chain: &Chain<T>, index: usize) {
        let slot = self.lower_bound(index);
        let on_removed = slot < self.len() && self.fingers[slot].index == index;

        if recommended_fingers(chain.len() - 1) < self.len() {
            let victim = if slot < self.len() { slot } else { slot - 1 };
            self.remove_slots(victim, 1);
            self.shift_left(victim, 1);
            return;
        }
        if !on_removed {
            self.shift_left(slot, 1);
            return;
        }

        // The finger must survive but its node is going away: push the run
        // of adjacent fingers starting at it one node to the right, or else
        // the run ending at it one node to the left.
        if let Some(end) = self.right_gap(slot) {
            for finger in &mut self.fingers[slot..=end] {
                finger.rewind_right(chain, 1);
            }
            self.shift_left(slot, 1);
        } else if let Some(start) = self.left_gap(slot) {
            for finger in &mut self.fingers[start..=slot] {
                finger.rewind_left(chain, 1);
            }
            self.shift_left(slot + 1, 1);
        } else {
            unreachable!(
                "no free position for finger {} among {} fingers over {} nodes",
                slot,
                self.len(),
                chain.len()
            );
        }
    }

    /// Last slot of the run of adjacent fingers starting at `slot`, if the
    /// position right after the run is free.
    fn right_gap(&self, slot: usize) -> Option<usize> {
        let mut end = slot;
        loop {
            if self.fingers[end + 1].index > self.fingers[end].index + 1 {
                return Some(end);
            }
            if end + 1 == self.len() {
                return None;
            }
            end += 1;
        }
    }

    /// First slot of the run of adjacent fingers ending at `slot`, if the
    /// position right before the run is free.
    fn left_gap(&self, slot: usize) -> Option<usize> {
        let mut start = slot;
        loop {
            if start == 0 {
                return if self.fingers[0].index > 0 {
                    Some(0)
                } else {
                    None
                };
            }
            if self.fingers[start - 1].index + 1 < self.fingers[start].index {
                return Some(start);
            }
            start -= 1;
        }
    }

    /// Finger upkeep after `count` nodes were linked in at `index`.
    ///
    /// `run` yields the new nodes in order. The fingers the larger length
    /// calls for are spread evenly over the inserted run, which only holds
    /// free positions once the fingers after it have been shifted.
    pub(crate) fn on_insert_run<I>(&mut self, index: usize, count: usize, len: usize, run: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        let slot = self.lower_bound(index);
        self.shift_right(slot, count);
        let extra = recommended_fingers(len).saturating_sub(self.len());
        if extra == 0 {
            return;
        }
        let mut stride = Stride::new(index, count, extra);
        let mut fingers = Vec::with_capacity(extra);
        for (offset, node) in run.into_iter().enumerate() {
            if stride.peek() == Some(index + offset) {
                fingers.push(Finger::new(node, index + offset));
                stride.next();
            }
        }
        debug_assert_eq!(fingers.len(), extra);
        self.insert_fingers(slot, &fingers);
    }

    /// Finger upkeep after the nodes `from..from + removed` were unlinked.
    ///
    /// `before` and `after` are the nodes that surrounded the removed run.
    /// The fingers still hold their positions from before the removal.
    pub(crate) fn on_remove_range<T>(
        &mut self,
        chain: &Chain<T>,
        from: usize,
        removed: usize,
        before: Option<NodeId>,
        after: Option<NodeId>,
    ) {
        let len = chain.len();
        let mut lo = self.lower_bound(from);
        let mut hi = self.lower_bound(from + removed);
        let drop = self.len() - recommended_fingers(len);
        let covered = hi - lo;

        let (prefix, suffix) = if covered >= drop {
            self.load_finger_coverage_counters(from, lo, hi, len, covered - drop)
        } else {
            // Not enough fingers inside the range; widen the window over the
            // neighbouring fingers until it holds all that must go.
            for _ in covered..drop {
                if self.len() - hi >= lo {
                    hi += 1;
                } else {
                    lo -= 1;
                }
            }
            (0, 0)
        };

        let kept = prefix + suffix;
        self.remove_slots(lo + kept, hi - lo - kept);
        self.shift_left(lo + kept, removed);
        self.arrange_prefix(chain, lo, prefix, from, before);
        self.arrange_suffix(chain, lo + prefix, suffix, from, after);

        debug!(
            "removed {}..{}: dropped {} fingers, moved {} to the prefix and {} to the suffix",
            from,
            from + removed,
            drop,
            prefix,
            suffix
        );
    }

    /// Split `kept` fingers between the prefix `0..from` and the suffix
    /// `from..len` in proportion to the free positions on each side.
    ///
    /// `lo` and `hi` delimit the slots of the fingers inside the removed
    /// range; fingers before `lo` live in the prefix, those from `hi` on in
    /// the suffix.
    fn load_finger_coverage_counters(
        &self,
        from: usize,
        lo: usize,
        hi: usize,
        len: usize,
        kept: usize,
    ) -> (usize, usize) {
        let prefix_free = from - lo;
        let suffix_free = (len - from) - (self.len() - hi);
        let free = prefix_free + suffix_free;
        debug_assert!(kept <= free);
        if kept == 0 {
            return (0, 0);
        }
        let mut prefix = ((kept * prefix_free + free / 2) / free).min(prefix_free);
        let mut suffix = kept - prefix;
        if suffix > suffix_free {
            suffix = suffix_free;
            prefix = kept - suffix;
        }
        (prefix, suffix)
    }

    /// Place the `count` fingers in slots `lo..lo + count` right before
    /// `limit`, pushing the prefix fingers in slots `..lo` to the left where
    /// they collide. `before` is the node at `limit - 1`.
    fn arrange_prefix<T>(
        &mut self,
        chain: &Chain<T>,
        lo: usize,
        count: usize,
        mut limit: usize,
        before: Option<NodeId>,
    ) {
        if count == 0 {
            return;
        }
        let mut node = before.expect("fingers moved into an empty prefix");
        let mut at = limit - 1;
        for slot in (0..lo + count).rev() {
            if slot < lo && self.fingers[slot].index < limit {
                break;
            }
            let target = limit - 1;
            node = chain.walk_backward(node, at - target);
            at = target;
            self.fingers[slot] = Finger::new(node, target);
            limit = target;
        }
    }

    /// Place the `count` fingers in slots `start..start + count` from
    /// `next_free` on, pushing the suffix fingers after them to the right
    /// where they collide. `after` is the node at `next_free`.
    fn arrange_suffix<T>(
        &mut self,
        chain: &Chain<T>,
        start: usize,
        count: usize,
        mut next_free: usize,
        after: Option<NodeId>,
    ) {
        if count == 0 {
            return;
        }
        let mut node = after.expect("fingers moved into an empty suffix");
        let mut at = next_free;
        for slot in start..self.len() {
            if slot >= start + count && self.fingers[slot].index >= next_free {
                break;
            }
            node = chain.walk_forward(node, next_free - at);
            at = next_free;
            self.fingers[slot] = Finger::new(node, next_free);
            next_free += 1;
        }
    }

    /// Evenly re-space the fingers whose indices lie in `from..to`. `start`
    /// is the node at `from`.
    pub(crate) fn distribute<T>(&mut self, chain: &Chain<T>, from: usize, to: usize, start: NodeId) {
        let lo = self.lower_bound(from);
        let hi = self.lower_bound(to);
        let count = hi - lo;
        if count == 0 {
            return;
        }
        trace!("distributing {} fingers over {}..{}", count, from, to);
        let (mut node, mut at) = (start, from);
        for (slot, target) in (lo..hi).zip(Stride::new(from, to - from, count)) {
            node = chain.walk_forward(node, target - at);
            at = target;
            self.fingers[slot] = Finger::new(node, target);
        }
    }

    /// Forget every finger; the list is empty again.
    pub(crate) fn clear(&mut self) {
        let len = self.len();
        self.remove_slots(0, len);
        self.fingers[0] = Finger::sentinel(0);
    }
}

/// `count` evenly spaced positions in `start..start + width`.
struct Stride {
    start: usize,
    width: usize,
    count: usize,
    i: usize,
}

impl Stride {
    fn new(start: usize, width: usize, count: usize) -> Self {
        debug_assert!(count <= width);
        Self {
            start,
            width,
            count,
            i: 0,
        }
    }

    fn peek(&self) -> Option<usize> {
        if self.i < self.count {
            Some(self.start + self.i * self.width / self.count)
        } else {
            None
        }
    }
}

impl Iterator for Stride {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let position = self.peek()?;
        self.i += 1;
        Some(position)
    }
}
