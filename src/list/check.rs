use crate::error::{InvariantViolation, ListError};
use crate::list::finger::recommended_fingers;
use crate::list::node::NodeId;
use crate::list::IndexedList;

impl<T> IndexedList<T> {
    /// Walks the whole structure and verifies every invariant it relies on:
    ///
    /// - the chain holds exactly `len` nodes, each linking back to its
    ///   predecessor, and the tail link points at the last of them;
    /// - the arena holds no node outside the chain;
    /// - the fingers are sorted by strictly increasing index, each in
    ///   bounds and referencing the node that really is at its index;
    /// - there are exactly `ceil(sqrt(len))` of them, followed by a
    ///   sentinel that references no node and whose index is `len`.
    ///
    /// This is a diagnostic for tests; it takes *O*(*n*) time.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Invariant`] naming the first broken invariant.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = (0..100).collect();
    /// list.remove_range(10..90).unwrap();
    /// assert!(list.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<(), ListError> {
        let nodes = self.check_chain()?;
        self.check_fingers(&nodes)?;
        Ok(())
    }

    /// Walk the chain from head, returning its nodes in order.
    fn check_chain(&self) -> Result<Vec<NodeId>, InvariantViolation> {
        let len = self.len();
        let mut nodes = Vec::with_capacity(len);
        let mut prev = None;
        let mut cursor = self.chain.head();
        while let Some(node) = cursor {
            if nodes.len() == len {
                return Err(InvariantViolation::LengthMismatch {
                    walked: nodes.len() + 1,
                    len,
                });
            }
            if self.chain.prev(node) != prev {
                return Err(InvariantViolation::BrokenBackLink { index: nodes.len() });
            }
            nodes.push(node);
            prev = Some(node);
            cursor = self.chain.next(node);
        }
        if nodes.len() != len {
            return Err(InvariantViolation::LengthMismatch {
                walked: nodes.len(),
                len,
            });
        }
        if self.chain.tail() != prev {
            return Err(InvariantViolation::TailMismatch);
        }
        let occupied = self.chain.arena().occupied();
        if occupied != len {
            return Err(InvariantViolation::ArenaLeak { occupied, len });
        }
        Ok(nodes)
    }

    fn check_fingers(&self, nodes: &[NodeId]) -> Result<(), InvariantViolation> {
        let len = nodes.len();
        let index = self.fingers.borrow();
        let (sentinel, fingers) = index
            .as_slice()
            .split_last()
            .expect("the finger index always holds its sentinel");
        if sentinel.node.is_some() {
            return Err(InvariantViolation::SentinelNode);
        }
        if sentinel.index != len {
            return Err(InvariantViolation::SentinelIndex {
                index: sentinel.index,
                len,
            });
        }
        let expected = recommended_fingers(len);
        if fingers.len() != expected {
            return Err(InvariantViolation::FingerCount {
                expected,
                actual: fingers.len(),
            });
        }
        for (slot, finger) in fingers.iter().enumerate() {
            if slot > 0 && fingers[slot - 1].index >= finger.index {
                return Err(InvariantViolation::UnsortedFingers {
                    slot,
                    previous: fingers[slot - 1].index,
                    index: finger.index,
                });
            }
            if finger.index >= len {
                return Err(InvariantViolation::FingerOutOfBounds {
                    slot,
                    index: finger.index,
                    len,
                });
            }
            if finger.node != Some(nodes[finger.index]) {
                return Err(InvariantViolation::FingerNodeMismatch {
                    slot,
                    index: finger.index,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{IndexedList, InvariantViolation, ListError};

    fn violation(list: &IndexedList<i32>) -> InvariantViolation {
        match list.check_invariants() {
            Err(ListError::Invariant(violation)) => violation,
            other => panic!("expected a violation, got {:?}", other),
        }
    }

    #[test]
    fn healthy_lists_pass() {
        for len in [0, 1, 2, 3, 10, 99, 100, 101] {
            let list: IndexedList<_> = (0..len).collect();
            assert_eq!(list.check_invariants(), Ok(()), "len = {}", len);
        }
    }

    #[test]
    fn detects_stale_finger() {
        let mut list: IndexedList<_> = (0..10).collect();
        let fingers = list.fingers.get_mut().as_mut_slice();
        fingers[0].node = fingers[1].node;
        let index = fingers[0].index;
        assert_eq!(
            violation(&list),
            InvariantViolation::FingerNodeMismatch { slot: 0, index }
        );
    }

    #[test]
    fn detects_unsorted_fingers() {
        let mut list: IndexedList<_> = (0..10).collect();
        let fingers = list.fingers.get_mut().as_mut_slice();
        fingers.swap(0, 1);
        assert!(matches!(
            violation(&list),
            InvariantViolation::UnsortedFingers { slot: 1, .. }
        ));
    }

    #[test]
    fn detects_wrong_sentinel() {
        let mut list: IndexedList<_> = (0..10).collect();
        let fingers = list.fingers.get_mut();
        let end = fingers.len();
        fingers.shift_right(end, 1);
        assert_eq!(
            violation(&list),
            InvariantViolation::SentinelIndex { index: 11, len: 10 }
        );
    }
}
