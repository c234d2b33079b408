//! Mutable windows onto an [`IndexedList`].
//!
//! A [`SubList`] holds no nodes of its own. It is an `offset`/`len` pair
//! over its parent, which is either the list itself or another view, and
//! translates every local index to an absolute index of the root list.
//! Structural changes made through a view are applied to the root and then
//! reported up the chain of parents, so that each enclosing view keeps its
//! length and version in sync.
//!
//! ```text
//!   root:    [0 1 2 3 4 5 6 7 8 9]
//!   view:          [3 4 5 6 7]        offset 3, len 5
//!   nested:          [5 6]            offset 2 in `view`, absolute base 5
//! ```

use crate::error::{check_index, check_position, check_range, ListError};
use crate::list::IndexedList;
use crate::Iter;
use std::cmp::Ordering;
use std::fmt;
use std::ops::RangeBounds;

/// Something a [`SubList`] can be opened on.
pub(crate) trait Parent<T> {
    fn root(&self) -> &IndexedList<T>;

    fn root_mut(&mut self) -> &mut IndexedList<T>;

    /// Absolute index of this level's first element.
    fn base(&self) -> usize;

    /// Account for `added` insertions and `removed` removals made through a
    /// nested view.
    fn adjust(&mut self, added: usize, removed: usize);
}

impl<T> Parent<T> for IndexedList<T> {
    fn root(&self) -> &IndexedList<T> {
        self
    }

    fn root_mut(&mut self) -> &mut IndexedList<T> {
        self
    }

    fn base(&self) -> usize {
        0
    }

    fn adjust(&mut self, _added: usize, _removed: usize) {}
}

/// A mutable view of a contiguous range of an [`IndexedList`].
///
/// Indices passed to a `SubList` are relative to the start of the view.
/// The view borrows its parent mutably, and every change made through it
/// lands directly in the root list.
///
/// Every operation that reaches the root list first checks that the root
/// has not changed structurally since the view last synchronized with it.
/// Operations that return a `Result` fail with [`ListError::Conflict`] on a
/// mismatch; the others panic.
///
/// # Examples
///
/// ```
/// use finger_list::IndexedList;
///
/// let mut list: IndexedList<_> = (0..10).collect();
/// {
///     let mut view = list.sub_list(2..8).unwrap();
///     view.remove(0).unwrap();
///     view.push_back(100);
///     {
///         let mut nested = view.sub_list(1..3).unwrap();
///         nested.clear().unwrap();
///     }
///     assert_eq!(view.to_vec(), vec![3, 6, 7, 100]);
/// }
/// assert_eq!(list.to_vec(), vec![0, 1, 3, 6, 7, 100, 8, 9]);
/// ```
pub struct SubList<'a, T: 'a> {
    parent: &'a mut (dyn Parent<T> + 'a),
    offset: usize,
    len: usize,
    expected_version: u64,
}

impl<'a, T: 'a> SubList<'a, T> {
    pub(crate) fn new(parent: &'a mut (dyn Parent<T> + 'a), offset: usize, len: usize) -> Self {
        let expected_version = parent.root().version();
        Self {
            parent,
            offset,
            len,
            expected_version,
        }
    }

    fn check_version(&self) -> Result<(), ListError> {
        let actual = self.root().version();
        if actual == self.expected_version {
            Ok(())
        } else {
            Err(ListError::Conflict {
                expected: self.expected_version,
                actual,
            })
        }
    }

    /// Panicking form of `check_version` for operations with no error path.
    fn assert_in_sync(&self) {
        if let Err(err) = self.check_version() {
            panic!("{}", err);
        }
    }

    /// Link `element` in at local `position`, which must be valid.
    fn link(&mut self, position: usize, element: T) {
        self.assert_in_sync();
        let absolute = self.base() + position;
        let root = self.root_mut();
        let next = root.node_before(absolute);
        root.link_at(absolute, next, element);
        self.adjust(1, 0);
    }

    /// Unlink the element at local `index`, which must be valid.
    fn unlink(&mut self, index: usize) -> T {
        self.assert_in_sync();
        let absolute = self.base() + index;
        let root = self.root_mut();
        let node = root.node_mut(absolute);
        let element = root.unlink_at(absolute, node);
        self.adjust(0, 1);
        element
    }

    /// Returns the number of elements in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Provides a reference to the element at local `index`, or `None` if it
    /// is outside the view.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.assert_in_sync();
        if index >= self.len {
            return None;
        }
        self.root().get(self.base() + index)
    }

    /// Provides a mutable reference to the element at local `index`, or
    /// `None` if it is outside the view.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.assert_in_sync();
        if index >= self.len {
            return None;
        }
        let absolute = self.base() + index;
        self.root_mut().get_mut(absolute)
    }

    /// Replaces the element at local `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `index >= len`, or
    /// [`ListError::Conflict`] if the view is out of sync.
    pub fn set(&mut self, index: usize, element: T) -> Result<T, ListError> {
        self.check_version()?;
        check_index(index, self.len)?;
        let absolute = self.base() + index;
        self.root_mut().set(absolute, element)
    }

    /// Inserts `element` at local `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `position > len`, or
    /// [`ListError::Conflict`] if the view is out of sync.
    pub fn insert(&mut self, position: usize, element: T) -> Result<(), ListError> {
        self.check_version()?;
        check_position(position, self.len)?;
        self.link(position, element);
        Ok(())
    }

    /// Removes the element at local `index` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `index >= len`, or
    /// [`ListError::Conflict`] if the view is out of sync.
    pub fn remove(&mut self, index: usize) -> Result<T, ListError> {
        self.check_version()?;
        check_index(index, self.len)?;
        Ok(self.unlink(index))
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Like [`front`](Self::front), but an empty view is an error.
    pub fn first(&self) -> Result<&T, ListError> {
        self.front().ok_or(ListError::Empty)
    }

    /// Like [`back`](Self::back), but an empty view is an error.
    pub fn last(&self) -> Result<&T, ListError> {
        self.back().ok_or(ListError::Empty)
    }

    /// Inserts `element` at the start of the view.
    pub fn push_front(&mut self, element: T) {
        self.link(0, element);
    }

    /// Inserts `element` at the end of the view, right before the first
    /// element after it in the root list.
    pub fn push_back(&mut self, element: T) {
        let len = self.len;
        self.link(len, element);
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.unlink(0))
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let index = self.len.checked_sub(1)?;
        Some(self.unlink(index))
    }

    /// Like [`pop_front`](Self::pop_front), but an empty view is an error.
    pub fn remove_first(&mut self) -> Result<T, ListError> {
        self.pop_front().ok_or(ListError::Empty)
    }

    /// Like [`pop_back`](Self::pop_back), but an empty view is an error.
    pub fn remove_last(&mut self) -> Result<T, ListError> {
        self.pop_back().ok_or(ListError::Empty)
    }

    /// Inserts every element of `elements` at local `position`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfBounds`] if `position > len`, or
    /// [`ListError::Conflict`] if the view is out of sync.
    pub fn insert_all<I>(&mut self, position: usize, elements: I) -> Result<(), ListError>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_version()?;
        check_position(position, self.len)?;
        let absolute = self.base() + position;
        let root = self.root_mut();
        let before = root.len();
        root.insert_all(absolute, elements)?;
        let added = root.len() - before;
        self.adjust(added, 0);
        Ok(())
    }

    /// Removes the elements in local `range`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::RangeOutOfBounds`] if the range does not fit the
    /// view, or [`ListError::Conflict`] if the view is out of sync.
    pub fn remove_range<R>(&mut self, range: R) -> Result<(), ListError>
    where
        R: RangeBounds<usize>,
    {
        self.check_version()?;
        let (from, to) = check_range(range, self.len)?;
        let base = self.base();
        self.root_mut().remove_range(base + from..base + to)?;
        self.adjust(0, to - from);
        Ok(())
    }

    /// Removes every element of the view from the root list.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the view is out of sync.
    pub fn clear(&mut self) -> Result<(), ListError> {
        self.remove_range(..)
    }

    /// Stable sort of the elements in the view with a comparator function.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the view is out of sync.
    pub fn sort_by<F>(&mut self, compare: F) -> Result<(), ListError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.check_version()?;
        let (base, len) = (self.base(), self.len);
        self.root_mut().sort_range(base, base + len, compare);
        self.adjust(0, 0);
        Ok(())
    }

    /// Provides a forward iterator over the view.
    pub fn iter(&self) -> Iter<'_, T> {
        self.assert_in_sync();
        let root = self.root();
        if self.is_empty() {
            return Iter::range(&root.chain, None, None, 0);
        }
        let front = root.node_ref(self.base());
        let back = root.node_ref(self.base() + self.len - 1);
        Iter::range(&root.chain, Some(front), Some(back), self.len)
    }

    /// Copies the elements of the view into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }

    /// Returns the local index of the first element equal to `x`.
    pub fn position(&self, x: &T) -> Option<usize>
    where
        T: PartialEq<T>,
    {
        self.iter().position(|e| e == x)
    }

    /// Provides a view over local `range` of this view.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::RangeOutOfBounds`] if the range does not fit the
    /// view, or [`ListError::Conflict`] if the view is out of sync.
    pub fn sub_list<R>(&mut self, range: R) -> Result<SubList<'_, T>, ListError>
    where
        R: RangeBounds<usize>,
    {
        self.check_version()?;
        let (from, to) = check_range(range, self.len)?;
        Ok(SubList::new(self, from, to - from))
    }
}

impl<'a, T: 'a> Parent<T> for SubList<'a, T> {
    fn root(&self) -> &IndexedList<T> {
        self.parent.root()
    }

    fn root_mut(&mut self) -> &mut IndexedList<T> {
        self.parent.root_mut()
    }

    fn base(&self) -> usize {
        self.parent.base() + self.offset
    }

    fn adjust(&mut self, added: usize, removed: usize) {
        self.len = self.len + added - removed;
        self.expected_version = self.parent.root().version();
        self.parent.adjust(added, removed);
    }
}

impl<T: fmt::Debug> fmt::Debug for SubList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'s, 'a, T: 'a> IntoIterator for &'s SubList<'a, T> {
    type Item = &'s T;
    type IntoIter = Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
