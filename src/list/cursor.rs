use crate::error::ListError;
use crate::list::node::NodeId;
use crate::list::IndexedList;
use std::fmt;
use std::fmt::Formatter;

/// A positional cursor over an [`IndexedList`].
///
/// A `Cursor` is like a bidirectional iterator that can also insert, remove
/// and replace elements where it stands. It does not borrow the list: every
/// call takes the list as an argument, so several cursors over one list can
/// be kept around at the same time.
///
/// In a list with length *n*, there are *n* + 1 valid positions for the
/// cursor, indexed by 0, 1, ..., *n*. The cursor sits *between* the element
/// at `previous_index` and the element at `next_index`.
///
/// The cursor remembers the [version](IndexedList::version) of the list when
/// it was created, and after each structural change it makes itself. Any
/// call made after the list changed through other means fails with
/// [`ListError::Conflict`]; the cursor has to be re-acquired. A cursor passed
/// a list other than the one that created it fails with
/// [`ListError::ForeignCursor`].
///
/// # Examples
///
/// Here is a simple example showing how the cursor works (`|` marks the
/// cursor position).
/// ```
/// use finger_list::{IndexedList, ListError};
///
/// // Create a list: [A B C D]
/// let mut list: IndexedList<_> = "ABCD".chars().collect();
///
/// // Create a cursor at start: [|A B C D] (next_index = 0)
/// let mut cursor = list.cursor_front();
///
/// // Move forward twice: [A B|C D] (next_index = 2)
/// assert_eq!(cursor.next(&list), Ok(Some(&'A')));
/// assert_eq!(cursor.next(&list), Ok(Some(&'B')));
///
/// // Remove the element just returned: [A|C D] (next_index = 1)
/// assert_eq!(cursor.remove(&mut list), Ok('B'));
///
/// // Insert before the next element: [A X|C D] (next_index = 2)
/// cursor.insert(&mut list, 'X').unwrap();
/// assert_eq!(list.iter().collect::<String>(), "AXCD");
///
/// // A change made outside the cursor invalidates it.
/// list.push_back('E');
/// assert!(matches!(cursor.next(&list), Err(ListError::Conflict { .. })));
/// ```
#[derive(Clone)]
pub struct Cursor {
    next: Option<NodeId>,
    next_index: usize,
    last_returned: Option<(NodeId, usize)>,
    list_id: u64,
    expected_version: u64,
}

impl Cursor {
    pub(crate) fn new(
        next: Option<NodeId>,
        next_index: usize,
        list_id: u64,
        version: u64,
    ) -> Self {
        Self {
            next,
            next_index,
            last_returned: None,
            list_id,
            expected_version: version,
        }
    }

    fn check_version<T>(&self, list: &IndexedList<T>) -> Result<(), ListError> {
        if self.list_id != list.id {
            Err(ListError::ForeignCursor)
        } else if self.expected_version == list.version {
            Ok(())
        } else {
            Err(ListError::Conflict {
                expected: self.expected_version,
                actual: list.version,
            })
        }
    }

    /// Step over the next node, returning it.
    fn advance<T>(&mut self, list: &IndexedList<T>) -> Result<Option<NodeId>, ListError> {
        self.check_version(list)?;
        let node = match self.next {
            Some(node) => node,
            None => return Ok(None),
        };
        self.last_returned = Some((node, self.next_index));
        self.next = list.chain.next(node);
        self.next_index += 1;
        Ok(Some(node))
    }

    /// Step back over the previous node, returning it.
    fn retreat<T>(&mut self, list: &IndexedList<T>) -> Result<Option<NodeId>, ListError> {
        self.check_version(list)?;
        if self.next_index == 0 {
            return Ok(None);
        }
        let node = match self.next {
            Some(next) => list.chain.prev(next),
            None => list.chain.tail(),
        }
        .expect("a cursor past the head has a previous node");
        self.next = Some(node);
        self.next_index -= 1;
        self.last_returned = Some((node, self.next_index));
        Ok(Some(node))
    }

    /// Returns the index of the element the next call to [`next`](Self::next)
    /// would return, or the length of the list at the end.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Returns the index of the element the next call to
    /// [`previous`](Self::previous) would return, or `None` at the start.
    #[inline]
    pub fn previous_index(&self) -> Option<usize> {
        self.next_index.checked_sub(1)
    }

    /// Returns `true` if there is an element after the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the list changed outside this
    /// cursor.
    pub fn has_next<T>(&self, list: &IndexedList<T>) -> Result<bool, ListError> {
        self.check_version(list)?;
        Ok(self.next_index < list.len())
    }

    /// Returns `true` if there is an element before the cursor.
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.next_index > 0
    }

    /// Moves the cursor forward and returns the element it stepped over, or
    /// `None` at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the list changed outside this
    /// cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list: IndexedList<_> = [1, 2].into_iter().collect();
    /// let mut cursor = list.cursor_front();
    /// assert_eq!(cursor.next(&list), Ok(Some(&1)));
    /// assert_eq!(cursor.next(&list), Ok(Some(&2)));
    /// assert_eq!(cursor.next(&list), Ok(None));
    /// ```
    pub fn next<'a, T>(&mut self, list: &'a IndexedList<T>) -> Result<Option<&'a T>, ListError> {
        Ok(self.advance(list)?.map(|node| list.chain.element(node)))
    }

    /// Like [`next`](Self::next), but returns a mutable reference.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the list changed outside this
    /// cursor.
    pub fn next_mut<'a, T>(
        &mut self,
        list: &'a mut IndexedList<T>,
    ) -> Result<Option<&'a mut T>, ListError> {
        Ok(self.advance(list)?.map(|node| list.chain.element_mut(node)))
    }

    /// Moves the cursor backward and returns the element it stepped over, or
    /// `None` at the start of the list.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the list changed outside this
    /// cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list: IndexedList<_> = [1, 2].into_iter().collect();
    /// let mut cursor = list.cursor_back();
    /// assert_eq!(cursor.previous(&list), Ok(Some(&2)));
    /// assert_eq!(cursor.previous(&list), Ok(Some(&1)));
    /// assert_eq!(cursor.previous(&list), Ok(None));
    /// ```
    pub fn previous<'a, T>(
        &mut self,
        list: &'a IndexedList<T>,
    ) -> Result<Option<&'a T>, ListError> {
        Ok(self.retreat(list)?.map(|node| list.chain.element(node)))
    }

    /// Like [`previous`](Self::previous), but returns a mutable reference.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the list changed outside this
    /// cursor.
    pub fn previous_mut<'a, T>(
        &mut self,
        list: &'a mut IndexedList<T>,
    ) -> Result<Option<&'a mut T>, ListError> {
        Ok(self.retreat(list)?.map(|node| list.chain.element_mut(node)))
    }

    /// Removes the element last returned by [`next`](Self::next) or
    /// [`previous`](Self::previous).
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the list changed outside this
    /// cursor, or [`ListError::NoCurrentElement`] if no element was returned
    /// since the cursor was created or last changed the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::{IndexedList, ListError};
    ///
    /// let mut list: IndexedList<_> = [1, 2, 3].into_iter().collect();
    /// let mut cursor = list.cursor_back();
    /// assert_eq!(cursor.remove(&mut list), Err(ListError::NoCurrentElement));
    /// cursor.previous(&list).unwrap();
    /// assert_eq!(cursor.remove(&mut list), Ok(3));
    /// assert_eq!(cursor.remove(&mut list), Err(ListError::NoCurrentElement));
    /// ```
    pub fn remove<T>(&mut self, list: &mut IndexedList<T>) -> Result<T, ListError> {
        self.check_version(list)?;
        let (node, index) = self
            .last_returned
            .take()
            .ok_or(ListError::NoCurrentElement)?;
        if self.next == Some(node) {
            self.next = list.chain.next(node);
        } else {
            self.next_index -= 1;
        }
        let element = list.unlink_at(index, node);
        self.expected_version = list.version;
        Ok(element)
    }

    /// Replaces the element last returned by [`next`](Self::next) or
    /// [`previous`](Self::previous), returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the list changed outside this
    /// cursor, or [`ListError::NoCurrentElement`] if no element was returned
    /// since the cursor was created or last changed the list.
    pub fn set<T>(&mut self, list: &mut IndexedList<T>, element: T) -> Result<T, ListError> {
        self.check_version(list)?;
        let (node, _) = self.last_returned.ok_or(ListError::NoCurrentElement)?;
        Ok(std::mem::replace(list.chain.element_mut(node), element))
    }

    /// Inserts `element` right before the cursor. A following call to
    /// [`next`](Self::next) is unaffected, while [`previous`](Self::previous)
    /// would return the new element.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Conflict`] if the list changed outside this
    /// cursor.
    pub fn insert<T>(&mut self, list: &mut IndexedList<T>, element: T) -> Result<(), ListError> {
        self.check_version(list)?;
        list.link_at(self.next_index, self.next, element);
        self.next_index += 1;
        self.last_returned = None;
        self.expected_version = list.version;
        Ok(())
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("next_index", &self.next_index)
            .field("version", &self.expected_version)
            .finish()
    }
}
