//! Node storage for [`IndexedList`](crate::IndexedList).
//!
//! Nodes live in an [`Arena`] and link to each other through [`NodeId`]s
//! instead of pointers. Removing a node vacates its slot and pushes it on a
//! free list, so the next allocation reuses it before the arena grows.
//!
//! [`Chain`] owns an arena together with the `head`/`tail` links and the
//! element count, and provides the linking primitives the list is built on.

use std::fmt;

/// Handle of a node inside an [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) struct Node<T> {
    pub(crate) element: T,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

pub(crate) enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: Option<usize> },
}

pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Option<usize>,
    occupied: usize,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: None,
            occupied: 0,
        }
    }

    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        self.occupied += 1;
        match self.free {
            Some(index) => {
                let slot = std::mem::replace(&mut self.slots[index], Slot::Occupied(node));
                match slot {
                    Slot::Vacant { next_free } => self.free = next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
                NodeId(index)
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Vacate the slot of `id` and return the node it held.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<T> {
        let vacant = Slot::Vacant {
            next_free: self.free,
        };
        match std::mem::replace(&mut self.slots[id.0], vacant) {
            Slot::Occupied(node) => {
                self.free = Some(id.0);
                self.occupied -= 1;
                node
            }
            Slot::Vacant { .. } => unreachable!("node {:?} freed twice", id),
        }
    }

    #[cfg(test)]
    fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Slot::Occupied(_)))
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("dangling node {:?}", id),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("dangling node {:?}", id),
        }
    }

    /// Base pointer of the slot storage, for iterators that hand out
    /// disjoint mutable borrows of elements.
    pub(crate) fn as_mut_ptr(&mut self) -> *mut Slot<T> {
        self.slots.as_mut_ptr()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.occupied = 0;
    }
}

/// Returns the node in `slot` of the storage starting at `slots`.
///
/// # Safety
///
/// `slots` must come from [`Arena::as_mut_ptr`] of an arena that is still
/// alive and not reallocated, `id` must be occupied, and no other reference
/// to that node may be alive for `'a`.
pub(crate) unsafe fn node_at<'a, T>(slots: *mut Slot<T>, id: NodeId) -> &'a mut Node<T> {
    match &mut *slots.add(id.0) {
        Slot::Occupied(node) => node,
        Slot::Vacant { .. } => unreachable!("dangling node {:?}", id),
    }
}

/// A doubly-linked chain of nodes stored in an [`Arena`].
pub(crate) struct Chain<T> {
    arena: Arena<T>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> Chain<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub(crate) fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    pub(crate) fn arena(&self) -> &Arena<T> {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut Arena<T> {
        &mut self.arena
    }

    pub(crate) fn next(&self, id: NodeId) -> Option<NodeId> {
        self.arena.node(id).next
    }

    pub(crate) fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.arena.node(id).prev
    }

    pub(crate) fn element(&self, id: NodeId) -> &T {
        &self.arena.node(id).element
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.arena.node_mut(id).element
    }

    /// Follow `next` links `steps` times.
    pub(crate) fn walk_forward(&self, mut id: NodeId, steps: usize) -> NodeId {
        for _ in 0..steps {
            id = self.next(id).expect("walked past the tail of the chain");
        }
        id
    }

    /// Follow `prev` links `steps` times.
    pub(crate) fn walk_backward(&self, mut id: NodeId, steps: usize) -> NodeId {
        for _ in 0..steps {
            id = self.prev(id).expect("walked past the head of the chain");
        }
        id
    }

    /// Walk from the node at index `from` to the node at index `to`.
    pub(crate) fn walk(&self, id: NodeId, from: usize, to: usize) -> NodeId {
        if to >= from {
            self.walk_forward(id, to - from)
        } else {
            self.walk_backward(id, from - to)
        }
    }

    /// Locate the node at `index` by walking from the nearer end.
    pub(crate) fn walk_to(&self, index: usize) -> NodeId {
        debug_assert!(index < self.len, "walk_to({}) with length {}", index, self.len);
        let from_tail = self.len - 1 - index;
        if index <= from_tail {
            self.walk_forward(self.front_node(), index)
        } else {
            self.walk_backward(self.back_node(), from_tail)
        }
    }

    pub(crate) fn front_node(&self) -> NodeId {
        self.head.expect("the chain is empty")
    }

    pub(crate) fn back_node(&self) -> NodeId {
        self.tail.expect("the chain is empty")
    }

    fn connect(&mut self, prev: Option<NodeId>, next: Option<NodeId>) {
        match prev {
            Some(prev) => self.arena.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.arena.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    /// Link a new node holding `element` right before `next`, or at the
    /// tail when `next` is `None`.
    pub(crate) fn link_before(&mut self, next: Option<NodeId>, element: T) -> NodeId {
        let prev = match next {
            Some(next) => self.prev(next),
            None => self.tail,
        };
        let id = self.arena.alloc(Node {
            element,
            prev,
            next,
        });
        self.connect(prev, Some(id));
        self.connect(Some(id), next);
        self.len += 1;
        id
    }

    /// Unlink the node `id` and hand back its element.
    pub(crate) fn unlink(&mut self, id: NodeId) -> T {
        let node = self.arena.free(id);
        self.connect(node.prev, node.next);
        self.len -= 1;
        node.element
    }

    /// Unlink `count` consecutive nodes starting at `first`, dropping their
    /// elements. Returns the nodes that surrounded the run.
    pub(crate) fn unlink_run(
        &mut self,
        first: NodeId,
        count: usize,
    ) -> (Option<NodeId>, Option<NodeId>) {
        debug_assert!(count > 0 && count <= self.len);
        let before = self.prev(first);
        let mut cursor = Some(first);
        for _ in 0..count {
            let id = cursor.expect("run reaches past the tail of the chain");
            cursor = self.next(id);
            drop(self.arena.free(id));
        }
        self.connect(before, cursor);
        self.len -= count;
        (before, cursor)
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<T: Clone>(chain: &Chain<T>) -> Vec<T> {
        let mut out = Vec::new();
        let mut cursor = chain.head();
        while let Some(id) = cursor {
            out.push(chain.element(id).clone());
            cursor = chain.next(id);
        }
        out
    }

    #[test]
    fn arena_reuses_vacant_slots() {
        let mut arena = Arena::with_capacity(2);
        let a = arena.alloc(Node {
            element: 'a',
            prev: None,
            next: None,
        });
        let b = arena.alloc(Node {
            element: 'b',
            prev: None,
            next: None,
        });
        assert_eq!(arena.occupied(), 2);
        assert_eq!(arena.free(a).element, 'a');
        assert!(!arena.contains(a));
        let c = arena.alloc(Node {
            element: 'c',
            prev: None,
            next: None,
        });
        assert_eq!(c, a);
        assert_eq!(arena.node(c).element, 'c');
        assert_eq!(arena.node(b).element, 'b');
        assert_eq!(arena.occupied(), 2);
    }

    #[test]
    fn chain_link_and_unlink() {
        let mut chain = Chain::with_capacity(0);
        let two = chain.link_before(None, 2);
        let zero = chain.link_before(Some(two), 0);
        chain.link_before(Some(two), 1);
        chain.link_before(None, 3);
        assert_eq!(collect(&chain), vec![0, 1, 2, 3]);
        assert_eq!(chain.len(), 4);

        assert_eq!(chain.unlink(zero), 0);
        assert_eq!(chain.unlink(two), 2);
        assert_eq!(collect(&chain), vec![1, 3]);
        assert_eq!(chain.len(), 2);
        assert_eq!(*chain.element(chain.back_node()), 3);
    }

    #[test]
    fn chain_walks() {
        let mut chain = Chain::with_capacity(10);
        for i in 0..10 {
            chain.link_before(None, i);
        }
        for i in 0..10 {
            assert_eq!(*chain.element(chain.walk_to(i)), i);
        }
        let three = chain.walk_to(3);
        assert_eq!(*chain.element(chain.walk(three, 3, 8)), 8);
        assert_eq!(*chain.element(chain.walk(three, 3, 1)), 1);
    }

    #[test]
    fn chain_unlink_run() {
        let mut chain = Chain::with_capacity(10);
        for i in 0..10 {
            chain.link_before(None, i);
        }
        let (before, after) = chain.unlink_run(chain.walk_to(2), 5);
        assert_eq!(before.map(|id| *chain.element(id)), Some(1));
        assert_eq!(after.map(|id| *chain.element(id)), Some(7));
        assert_eq!(collect(&chain), vec![0, 1, 7, 8, 9]);
        assert_eq!(chain.arena().occupied(), 5);

        let (before, after) = chain.unlink_run(chain.front_node(), 5);
        assert_eq!((before, after), (None, None));
        assert_eq!(chain.len(), 0);
        assert_eq!(chain.head(), None);
        assert_eq!(chain.tail(), None);
    }
}
