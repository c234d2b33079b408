use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::mem;
use std::ops::RangeBounds;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{check_index, check_position, check_range, ListError};
use crate::list::cursor::Cursor;
use crate::list::finger::FingerIndex;
use crate::list::node::{Chain, NodeId};
use crate::list::view::SubList;
use crate::{IntoIter, Iter, IterMut, Splitter};

pub mod cursor;
pub mod iterator;
pub mod view;

mod algorithms;
mod check;
pub(crate) mod finger;
pub(crate) mod node;

pub use algorithms::{Drain, DrainFilter};
pub use finger::recommended_fingers;

/// The `IndexedList` is a doubly-linked list with array-like positional
/// access. Reading, replacing, inserting or removing an element at any index
/// takes *O*(√*n*) amortized time, while pushing and popping at either end
/// stays *O*(1) amortized.
///
/// The `IndexedList` contains:
/// - a chain of nodes stored in an arena and linked by integer ids;
/// - a finger index: `ceil(sqrt(len))` cached `(node, index)` pairs that
///   split the chain into segments of about √*n* nodes, so that locating an
///   index costs a binary search plus a short walk;
/// - a version counter, bumped on every structural change, which cursors
///   and views check before touching the list.
///
/// Every lookup rebalances the finger that served it, which is what keeps
/// the cost amortized over a sequence of operations. Reads through `&self`
/// do this through a `RefCell`, so the list is `Send` but not `Sync`.
///
/// # Naming Conventions
///
/// - `index`: an ordinal position in `0..len`;
/// - `position`: an insertion point in `0..=len`;
/// - `from..to`: a half-open range of indices.
pub struct IndexedList<T> {
    chain: Chain<T>,
    fingers: RefCell<FingerIndex>,
    id: u64,
    version: u64,
}

/// Source of the identities that tie cursors to the list they came from.
static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

// private methods
impl<T> IndexedList<T> {
    /// Locate the node at `index`, rebalancing along the way. No borrow of
    /// the finger index outlives this call.
    pub(crate) fn node_ref(&self, index: usize) -> NodeId {
        self.fingers.borrow_mut().get_node(&self.chain, index)
    }

    /// Like `node_ref`, without the runtime borrow check.
    pub(crate) fn node_mut(&mut self, index: usize) -> NodeId {
        self.fingers.get_mut().get_node(&self.chain, index)
    }

    /// The node currently at `position`, or `None` past the tail.
    fn node_before(&mut self, position: usize) -> Option<NodeId> {
        match position {
            _ if position == self.len() => None,
            0 => self.chain.head(),
            _ => Some(self.node_mut(position)),
        }
    }

    /// Link `element` in right before `next`, which sits at `index`.
    pub(crate) fn link_at(&mut self, index: usize, next: Option<NodeId>, element: T) -> NodeId {
        let node = self.chain.link_before(next, element);
        self.fingers.get_mut().on_insert(index, node, self.chain.len());
        self.version += 1;
        node
    }

    /// Unlink `node`, which sits at `index`.
    pub(crate) fn unlink_at(&mut self, index: usize, node: NodeId) -> T {
        self.fingers.get_mut().on_remove(&self.chain, index);
        let element = self.chain.unlink(node);
        self.version += 1;
        element
    }

    /// Link every element of `elements` in before `next`, which sits at
    /// `position`.
    fn link_run<I>(&mut self, position: usize, next: Option<NodeId>, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        let chain = &mut self.chain;
        let run: Vec<NodeId> = elements
            .into_iter()
            .map(|element| chain.link_before(next, element))
            .collect();
        if run.is_empty() {
            return;
        }
        let count = run.len();
        self.fingers
            .get_mut()
            .on_insert_run(position, count, self.chain.len(), run);
        self.version += 1;
    }

    /// Re-space the fingers covering `from..to` after the values in that
    /// range were permuted.
    pub(crate) fn distribute_fingers(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let start = self.node_mut(from);
        self.fingers.get_mut().distribute(&self.chain, from, to, start);
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }
}

impl<T> IndexedList<T> {
    /// Create an empty `IndexedList`.
    ///
    /// # Examples
    /// ```
    /// use finger_list::IndexedList;
    /// let list: IndexedList<u32> = IndexedList::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty `IndexedList` with room for `capacity` nodes before
    /// the node arena reallocates.
    ///
    /// # Examples
    /// ```
    /// use finger_list::IndexedList;
    /// let list: IndexedList<u32> = IndexedList::with_capacity(64);
    /// assert!(list.capacity() >= 64);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chain: Chain::with_capacity(capacity),
            fingers: RefCell::new(FingerIndex::new()),
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            version: 0,
        }
    }

    /// Returns `true` if the `IndexedList` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    /// assert!(list.is_empty());
    ///
    /// list.push_front("foo");
    /// assert!(!list.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the length of the `IndexedList`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    ///
    /// list.push_front(2);
    /// assert_eq!(list.len(), 1);
    ///
    /// list.push_front(1);
    /// assert_eq!(list.len(), 2);
    ///
    /// list.push_back(3);
    /// assert_eq!(list.len(), 3);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Number of nodes the arena holds before it reallocates.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.chain.arena().capacity()
    }

    /// Number of fingers currently indexing the list, which is always
    /// [`recommended_fingers(len)`](crate::recommended_fingers).
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::{recommended_fingers, IndexedList};
    ///
    /// let list: IndexedList<_> = (0..50).collect();
    /// assert_eq!(list.finger_count(), recommended_fingers(50));
    /// assert_eq!(list.finger_count(), 8);
    /// ```
    #[inline]
    pub fn finger_count(&self) -> usize {
        self.fingers.borrow().len()
    }

    /// The structural version of the list. It changes whenever elements are
    /// inserted, removed or reordered, but not when one is replaced in place.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Removes all elements from the `IndexedList`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    ///
    /// list.push_front(2);
    /// list.push_front(1);
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(list.front(), Some(&1));
    ///
    /// list.clear();
    /// assert_eq!(list.len(), 0);
    /// assert_eq!(list.front(), None);
    /// ```
    pub fn clear(&mut self) {
        self.chain.clear();
        self.fingers.get_mut().clear();
        self.version += 1;
    }

    /// Provides a reference to the element at `index`, or `None` if it is
    /// out of bounds.
    ///
    /// The lookup rebalances fingers like a mutable one does, so repeated
    /// reads of one region get faster.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(√*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list: IndexedList<_> = (0..10).collect();
    /// assert_eq!(list.get(7), Some(&7));
    /// assert_eq!(list.get(10), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        Some(self.chain.element(self.node_ref(index)))
    }

    /// Provides a mutable reference to the element at `index`, or `None` if
    /// it is out of bounds.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(√*n*) amortized time.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = (0..10).collect();
    /// if let Some(x) = list.get_mut(3) {
    ///     *x *= 10;
    /// }
    /// assert_eq!(list.get(3), Some(&30));
    /// ```
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        let node = self.node_mut(index);
        Some(self.chain.element_mut(node))
    }

    /// Replaces the element at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::{IndexedList, ListError};
    ///
    /// let mut list: IndexedList<_> = "abc".chars().collect();
    /// assert_eq!(list.set(1, 'x'), Ok('b'));
    /// assert_eq!(list.set(3, 'y'), Err(ListError::IndexOutOfBounds { index: 3, len: 3 }));
    /// assert_eq!(list.iter().collect::<String>(), "axc");
    /// ```
    pub fn set(&mut self, index: usize, element: T) -> Result<T, ListError> {
        check_index(index, self.len())?;
        let node = self.node_mut(index);
        Ok(mem::replace(self.chain.element_mut(node), element))
    }

    /// Provides a reference to the front element, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    /// assert_eq!(list.front(), None);
    ///
    /// list.push_front(1);
    /// assert_eq!(list.front(), Some(&1));
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.chain.head().map(|node| self.chain.element(node))
    }

    /// Provides a mutable reference to the front element, or `None` if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    /// list.push_front(1);
    ///
    /// if let Some(x) = list.front_mut() {
    ///     *x = 5;
    /// }
    /// assert_eq!(list.front(), Some(&5));
    /// ```
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let node = self.chain.head()?;
        Some(self.chain.element_mut(node))
    }

    /// Provides a reference to the back element, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    /// assert_eq!(list.back(), None);
    ///
    /// list.push_back(1);
    /// assert_eq!(list.back(), Some(&1));
    /// ```
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.chain.tail().map(|node| self.chain.element(node))
    }

    /// Provides a mutable reference to the back element, or `None` if the list
    /// is empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let node = self.chain.tail()?;
        Some(self.chain.element_mut(node))
    }

    /// Like [`front`](Self::front), but an empty list is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Empty`] if the list is empty.
    pub fn first(&self) -> Result<&T, ListError> {
        self.front().ok_or(ListError::Empty)
    }

    /// Like [`back`](Self::back), but an empty list is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Empty`] if the list is empty.
    pub fn last(&self) -> Result<&T, ListError> {
        self.back().ok_or(ListError::Empty)
    }

    /// Adds an element first in the list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(√*n*) time, for the fingers
    /// that follow the new element.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    ///
    /// list.push_front(2);
    /// assert_eq!(list.front().unwrap(), &2);
    ///
    /// list.push_front(1);
    /// assert_eq!(list.front().unwrap(), &1);
    /// ```
    pub fn push_front(&mut self, element: T) {
        let head = self.chain.head();
        self.link_at(0, head, element);
    }

    /// Appends an element to the back of a list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) amortized time.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    /// list.push_back(1);
    /// list.push_back(3);
    /// assert_eq!(list.back().unwrap(), &3);
    /// ```
    pub fn push_back(&mut self, element: T) {
        let len = self.len();
        self.link_at(len, None, element);
    }

    /// Removes the first element and returns it, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    /// assert_eq!(list.pop_front(), None);
    ///
    /// list.push_front(1);
    /// list.push_front(3);
    /// assert_eq!(list.pop_front(), Some(3));
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.chain.head()?;
        Some(self.unlink_at(0, head))
    }

    /// Removes the last element from a list and returns it, or `None` if
    /// it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    /// assert_eq!(list.pop_back(), None);
    /// list.push_back(1);
    /// list.push_back(3);
    /// assert_eq!(list.pop_back(), Some(3));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.chain.tail()?;
        let index = self.len() - 1;
        Some(self.unlink_at(index, tail))
    }

    /// Like [`pop_front`](Self::pop_front), but an empty list is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Empty`] if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::{IndexedList, ListError};
    ///
    /// let mut list = IndexedList::new();
    /// list.push_back('a');
    /// assert_eq!(list.remove_first(), Ok('a'));
    /// assert_eq!(list.remove_first(), Err(ListError::Empty));
    /// ```
    pub fn remove_first(&mut self) -> Result<T, ListError> {
        self.pop_front().ok_or(ListError::Empty)
    }

    /// Like [`pop_back`](Self::pop_back), but an empty list is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Empty`] if the list is empty.
    pub fn remove_last(&mut self) -> Result<T, ListError> {
        self.pop_back().ok_or(ListError::Empty)
    }

    /// Adds an element at the given position in the list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(√*n*) amortized time.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `position > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = [1, 2, 3].into_iter().collect();
    ///
    /// list.insert(2, 4).unwrap();
    /// list.insert(4, 5).unwrap();
    /// assert!(list.insert(6, 6).is_err());
    ///
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 4, 3, 5]);
    /// ```
    pub fn insert(&mut self, position: usize, element: T) -> Result<(), ListError> {
        check_position(position, self.len())?;
        let next = self.node_before(position);
        self.link_at(position, next, element);
        Ok(())
    }

    /// Removes the element at the given index and returns it.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(√*n*) amortized time.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    ///
    /// list.push_front(1);
    /// list.push_front(2);
    /// list.push_front(3);
    ///
    /// assert_eq!(list.remove(1), Ok(2));
    /// assert_eq!(list.remove(0), Ok(3));
    /// assert_eq!(list.remove(0), Ok(1));
    /// assert!(list.remove(0).is_err());
    /// ```
    pub fn remove(&mut self, index: usize) -> Result<T, ListError> {
        check_index(index, self.len())?;
        let node = self.node_mut(index);
        Ok(self.unlink_at(index, node))
    }

    /// Inserts every element of `elements`, in order, starting at
    /// `position`.
    ///
    /// The fingers the larger list needs are added in one step, evenly
    /// spaced over the inserted run.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*k* + √*n*) amortized time,
    /// where *k* is the number of inserted elements.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `position > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = [1, 2, 3].into_iter().collect();
    /// list.insert_all(2, [4, 5, 6]).unwrap();
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 4, 5, 6, 3]);
    /// ```
    pub fn insert_all<I>(&mut self, position: usize, elements: I) -> Result<(), ListError>
    where
        I: IntoIterator<Item = T>,
    {
        check_position(position, self.len())?;
        let next = self.node_before(position);
        self.link_run(position, next, elements);
        Ok(())
    }

    /// Appends every element of `elements` to the back of the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = [1, 2].into_iter().collect();
    /// list.append_all(3..6);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn append_all<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        self.link_run(len, None, elements);
    }

    /// Inserts every element of `elements`, in order, at the front of the
    /// list.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = [4, 5].into_iter().collect();
    /// list.prepend_all(1..4);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn prepend_all<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        let head = self.chain.head();
        self.link_run(0, head, elements);
    }

    /// Removes the elements in `range`, dropping them.
    ///
    /// Fingers that pointed into the range are either dropped or moved next
    /// to it, in proportion to the free room on each side.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*k* + √*n*) amortized time,
    /// where *k* is the number of removed elements.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::RangeOutOfBounds`] if the range is reversed or
    /// ends past `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = (0..10).collect();
    /// list.remove_range(2..8).unwrap();
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 1, 8, 9]);
    /// assert!(list.remove_range(3..5).is_err());
    /// ```
    pub fn remove_range<R>(&mut self, range: R) -> Result<(), ListError>
    where
        R: RangeBounds<usize>,
    {
        let (from, to) = check_range(range, self.len())?;
        let count = to - from;
        match count {
            0 => {}
            _ if count == self.len() => self.clear(),
            1 => drop(self.remove(from)?),
            _ => {
                let first = self.node_mut(from);
                let (before, after) = self.chain.unlink_run(first, count);
                self.fingers
                    .get_mut()
                    .on_remove_range(&self.chain, from, count, before, after);
                self.version += 1;
            }
        }
        Ok(())
    }

    /// Sorts the list in ascending order. The sort is stable.
    ///
    /// Elements move between nodes while the nodes stay in place, after
    /// which the fingers are spread evenly again.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* log *n*) time and *O*(*n*)
    /// memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = [5, 1, 4, 2, 3].into_iter().collect();
    /// list.sort();
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(T::cmp);
    }

    /// Sorts the list with a comparator function. The sort is stable.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = [5, 1, 4, 2, 3].into_iter().collect();
    /// list.sort_by(|a, b| b.cmp(a));
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
    /// ```
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        let len = self.len();
        self.sort_range(0, len, compare);
    }

    /// Sorts the list with a key extraction function. The sort is stable.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<i32> = [-5, 1, -4, 2, 3].into_iter().collect();
    /// list.sort_by_key(|x| x.abs());
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, -4, -5]);
    /// ```
    pub fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.sort_by(|a, b| key(a).cmp(&key(b)));
    }

    /// Spreads the fingers evenly over the whole list.
    ///
    /// Lookups rebalance fingers lazily; this does it for all of them at
    /// once, after which every index is at most `len / (2 * fingers)` nodes
    /// away from a finger.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn optimize(&mut self) {
        let len = self.len();
        self.distribute_fingers(0, len);
    }

    /// Provides a [`Cursor`] positioned before the element at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `position > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list: IndexedList<_> = [1, 2, 3].into_iter().collect();
    /// let mut cursor = list.cursor(1).unwrap();
    /// assert_eq!(cursor.next(&list), Ok(Some(&2)));
    /// assert!(list.cursor(4).is_err());
    /// ```
    pub fn cursor(&self, position: usize) -> Result<Cursor, ListError> {
        check_position(position, self.len())?;
        let next = if position == self.len() {
            None
        } else {
            Some(self.node_ref(position))
        };
        Ok(Cursor::new(next, position, self.id, self.version))
    }

    /// Provides a [`Cursor`] positioned before the first element.
    pub fn cursor_front(&self) -> Cursor {
        Cursor::new(self.chain.head(), 0, self.id, self.version)
    }

    /// Provides a [`Cursor`] positioned after the last element.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list: IndexedList<_> = [1, 2, 3].into_iter().collect();
    /// let mut cursor = list.cursor_back();
    /// assert_eq!(cursor.next(&list), Ok(None));
    /// assert_eq!(cursor.previous(&list), Ok(Some(&3)));
    /// ```
    pub fn cursor_back(&self) -> Cursor {
        Cursor::new(None, self.len(), self.id, self.version)
    }

    /// Provides a forward iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::new();
    ///
    /// list.push_back(0);
    /// list.push_back(1);
    /// list.push_back(2);
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.chain)
    }

    /// Provides a forward iterator with mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = (0..3).collect();
    ///
    /// for element in list.iter_mut() {
    ///     *element += 10;
    /// }
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&10));
    /// assert_eq!(iter.next(), Some(&11));
    /// assert_eq!(iter.next(), Some(&12));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(&mut self.chain)
    }

    /// Provides a [`Splitter`] over the whole list, for consuming it in
    /// independent batches.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list: IndexedList<_> = (0..1000).collect();
    /// let mut right = list.splitter();
    /// let left = right.try_split().unwrap();
    /// assert_eq!(left.len() + right.len(), 1000);
    /// assert_eq!(left.sum::<i32>() + right.sum::<i32>(), (0..1000).sum());
    /// ```
    #[inline]
    pub fn splitter(&self) -> Splitter<'_, T> {
        Splitter::new(&self.chain)
    }

    /// Provides a [`SubList`] over `range`. The view borrows the list
    /// mutably; its changes land directly in the list.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::RangeOutOfBounds`] if the range is reversed or
    /// ends past `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = (0..10).collect();
    /// let mut view = list.sub_list(3..6).unwrap();
    /// assert_eq!(view.get(0), Some(&3));
    /// view.clear().unwrap();
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 6, 7, 8, 9]);
    /// ```
    pub fn sub_list<R>(&mut self, range: R) -> Result<SubList<'_, T>, ListError>
    where
        R: RangeBounds<usize>,
    {
        let (from, to) = check_range(range, self.len())?;
        Ok(SubList::new(self, from, to - from))
    }
}

impl<T: Debug> Debug for IndexedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for IndexedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Ensure that `IndexedList` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: IndexedList<&'static str>) -> IndexedList<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str>) -> IntoIter<&'a str> {
        x
    }
}

#[cfg(test)]
mod tests {
    use crate::list::IndexedList;
    use crate::{recommended_fingers, ListError};
    use std::cell::RefCell;
    use std::fmt::Debug;

    fn list_eq<T, I>(list: &IndexedList<T>, expected: I)
    where
        T: Debug + Clone + Eq,
        I: IntoIterator<Item = T>,
    {
        assert_eq!(
            list.iter().cloned().collect::<Vec<_>>(),
            expected.into_iter().collect::<Vec<_>>()
        );
        list.check_invariants().unwrap();
    }

    #[test]
    fn list_create() {
        let mut list = IndexedList::<i32>::new();
        assert!(list.is_empty());
        assert_eq!(list.finger_count(), 0);
        list.push_back(1);
        assert!(!list.is_empty());
        assert_eq!(list.finger_count(), 1);
        assert_eq!(list.pop_back(), Some(1));
        assert!(list.is_empty());
        assert_eq!(list.finger_count(), 0);
        list.check_invariants().unwrap();
    }

    #[test]
    fn list_drop() {
        #[derive(Debug)]
        struct DropChecker<'a, T: Copy> {
            value: T,
            dropped: &'a RefCell<Vec<T>>,
        }
        impl<'a, T: Copy> DropChecker<'a, T> {
            fn new(value: T, dropped: &'a RefCell<Vec<T>>) -> Self {
                Self { value, dropped }
            }
        }
        impl<'a, T: Copy> Drop for DropChecker<'a, T> {
            fn drop(&mut self) {
                self.dropped.borrow_mut().push(self.value);
            }
        }
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut list = IndexedList::new();
        for i in 1..=6 {
            list.push_back(DropChecker::new(i, &dropped));
        }
        list.remove_range(1..3).unwrap();
        assert_eq!(dropped.borrow().as_slice(), &[2, 3]);
        drop(list.remove(0));
        assert_eq!(dropped.borrow().as_slice(), &[2, 3, 1]);
        drop(list);
        assert_eq!(dropped.borrow().len(), 6);
    }

    #[test]
    fn list_push_and_pop() {
        let mut list = IndexedList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);

        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);
        assert_eq!(list.first(), Err(ListError::Empty));
        assert_eq!(list.last(), Err(ListError::Empty));
        assert_eq!(list.remove_first(), Err(ListError::Empty));
        assert_eq!(list.remove_last(), Err(ListError::Empty));

        list.push_back(1);
        assert_eq!(list.back(), Some(&1));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());

        list.push_front(1);
        list.push_front(2);
        list.push_back(3);
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.front(), Some(&2));
        assert_eq!(list.first(), Ok(&2));
        assert_eq!(list.last(), Ok(&3));
        list_eq(&list, [2, 1, 3]);
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.remove_last(), Ok(3));

        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.remove_first(), Ok(1));
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.is_empty());
        list.check_invariants().unwrap();
    }

    #[test]
    fn list_insert_and_remove() {
        let mut list: IndexedList<_> = (0..10).collect();
        list.insert(5, 10).unwrap();
        list_eq(&list, (0..5).chain(Some(10)).chain(5..10));

        assert_eq!(list.remove(10), Ok(9));
        assert_eq!(list.back(), Some(&8));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9));

        list.insert(0, 11).unwrap();
        assert_eq!(list.front(), Some(&11));
        list_eq(&list, (11..=11).chain((0..5).chain(Some(10)).chain(5..9)));

        assert_eq!(list.remove(0), Ok(11));
        assert_eq!(list.front(), Some(&0));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9));

        list.insert(10, 12).unwrap();
        assert_eq!(list.back(), Some(&12));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9).chain(Some(12)));

        assert_eq!(
            list.insert(12, 0),
            Err(ListError::IndexOutOfBounds { index: 12, len: 11 })
        );
        assert_eq!(
            list.remove(11),
            Err(ListError::IndexOutOfBounds { index: 11, len: 11 })
        );
    }

    #[test]
    fn list_get_and_set() {
        let mut list: IndexedList<_> = (0..100).collect();
        for i in (0..100).rev().step_by(7) {
            assert_eq!(list.get(i), Some(&i));
            *list.get_mut(i).unwrap() += 1000;
        }
        for i in 0..100 {
            let expected = if (99 - i) % 7 == 0 { i + 1000 } else { i };
            assert_eq!(list.get(i), Some(&expected));
        }
        let version = list.version();
        assert_eq!(list.set(50, 0), Ok(50));
        assert_eq!(list.version(), version);
        assert_eq!(list.get(100), None);
        assert_eq!(list.get_mut(100), None);
        list.check_invariants().unwrap();
    }

    #[test]
    fn list_finger_policy_follows_length() {
        let mut list = IndexedList::new();
        for i in 0..200 {
            list.insert(i / 2, i).unwrap();
            assert_eq!(list.finger_count(), recommended_fingers(list.len()));
        }
        list.check_invariants().unwrap();
        while !list.is_empty() {
            let index = list.len() / 3;
            list.remove(index).unwrap();
            assert_eq!(list.finger_count(), recommended_fingers(list.len()));
        }
        list.check_invariants().unwrap();
    }

    #[test]
    fn list_insert_all() {
        fn test_insert_all<I1, I2, I3>(list: I1, other: I2, at: usize, expected: I3)
        where
            I1: IntoIterator<Item = i32>,
            I2: IntoIterator<Item = i32>,
            I3: IntoIterator<Item = i32>,
        {
            let mut list: IndexedList<_> = list.into_iter().collect();
            let version = list.version();
            list.insert_all(at, other).unwrap();
            list_eq(&list, expected);
            assert!(list.version() > version || list.is_empty());
        }
        test_insert_all(0..5, 5..7, 5, 0..7);
        test_insert_all(0..5, 5..7, 2, (0..2).chain(5..7).chain(2..5));
        test_insert_all(0..5, 5..7, 0, (5..7).chain(0..5));
        test_insert_all(0..5, 5..100, 3, (0..3).chain(5..100).chain(3..5));
        test_insert_all(0..50, Some(50), 25, (0..25).chain(Some(50)).chain(25..50));
        test_insert_all(Some(0), 1..3, 1, 0..3);
        test_insert_all(Some(0), 1..3, 0, (1..3).chain(Some(0)));
        test_insert_all(None, 0..40, 0, 0..40);
        test_insert_all(None, None, 0, None);

        let mut list: IndexedList<_> = (0..5).collect();
        assert_eq!(
            list.insert_all(6, 0..3),
            Err(ListError::IndexOutOfBounds { index: 6, len: 5 })
        );
    }

    #[test]
    fn list_append_and_prepend_all() {
        let mut list = IndexedList::new();
        list.append_all(10..20);
        list.prepend_all(0..10);
        list.append_all(20..30);
        list.prepend_all(None);
        list_eq(&list, 0..30);
        assert_eq!(list.finger_count(), recommended_fingers(30));
    }

    #[test]
    fn list_remove_range() {
        fn test_remove_range(len: i32, from: usize, to: usize) {
            let mut list: IndexedList<_> = (0..len).collect();
            let mut expected: Vec<_> = (0..len).collect();
            expected.drain(from..to);
            list.remove_range(from..to).unwrap();
            list_eq(&list, expected);
        }
        for &(len, from, to) in &[
            (100, 30, 70),
            (100, 0, 50),
            (100, 50, 100),
            (100, 0, 100),
            (100, 42, 43),
            (100, 42, 42),
            (100, 1, 99),
            (10, 2, 4),
            (1000, 3, 997),
        ] {
            test_remove_range(len, from, to);
        }

        let mut list: IndexedList<_> = (0..10).collect();
        list.remove_range(..=2).unwrap();
        list.remove_range(5..).unwrap();
        list_eq(&list, 3..8);
        assert!(list.remove_range(4..2).is_err());
        assert!(list.remove_range(0..6).is_err());
    }

    #[test]
    fn list_remove_range_after_lookups() {
        let mut list: IndexedList<_> = (0..400).collect();
        for i in (0..400).step_by(37) {
            list.get_mut(i);
        }
        list.remove_range(100..300).unwrap();
        list_eq(&list, (0..100).chain(300..400));
    }

    #[test]
    fn list_sort() {
        let mut list: IndexedList<_> = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5].into_iter().collect();
        let version = list.version();
        list.sort();
        list_eq(&list, [1, 1, 2, 3, 3, 4, 5, 5, 5, 6, 9]);
        assert_ne!(list.version(), version);

        let mut list: IndexedList<_> = (0..20).map(|i| (i % 3, i)).collect();
        list.sort_by_key(|&(key, _)| key);
        let expected: Vec<_> = (0..3)
            .flat_map(|key| (0..20).filter(move |i| i % 3 == key).map(move |i| (key, i)))
            .collect();
        list_eq(&list, expected);
    }

    #[test]
    fn list_optimize() {
        let mut list: IndexedList<_> = (0..100).collect();
        list.remove_range(10..60).unwrap();
        list.optimize();
        list_eq(&list, (0..10).chain(60..100));
    }

    #[test]
    fn list_clear() {
        let mut list: IndexedList<_> = (0..30).collect();
        let version = list.version();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.finger_count(), 0);
        assert!(list.version() > version);
        list.push_back(7);
        list_eq(&list, [7]);
    }

    fn widest_gap<T>(list: &IndexedList<T>) -> usize {
        let index = list.fingers.borrow();
        index
            .as_slice()
            .windows(2)
            .map(|pair| pair[1].index - pair[0].index)
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn shared_reads_respread_clustered_fingers() {
        let mut list: IndexedList<_> = (0..10_000).collect();
        list.remove_range(100..9_900).unwrap();
        list.check_invariants().unwrap();
        let clustered = widest_gap(&list);

        let shared = &list;
        for _ in 0..2 {
            for i in 0..shared.len() {
                assert_eq!(shared.get(i), Some(&if i < 100 { i } else { i + 9_800 }));
            }
        }
        assert!(widest_gap(&list) < clustered);
        assert_eq!(list.finger_count(), recommended_fingers(200));
        list.check_invariants().unwrap();
    }

    #[test]
    fn list_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<IndexedList<i32>>();
        assert_send::<crate::Iter<'static, i32>>();
        assert_send::<crate::Splitter<'static, i32>>();
    }
}
