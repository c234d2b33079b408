use crate::list::cursor::Cursor;
use crate::IndexedList;
use std::fmt;

/// A draining iterator over the elements of an `IndexedList`.
///
/// This `struct` is created by [`IndexedList::drain`].
pub struct Drain<'a, T: 'a> {
    list: &'a mut IndexedList<T>,
}

impl<'a, T: 'a> Drain<'a, T> {
    pub(crate) fn new(list: &'a mut IndexedList<T>) -> Self {
        Self { list }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for Drain<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        if !self.list.is_empty() {
            self.list.clear();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Drain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Drain").field(self.list).finish()
    }
}

/// An iterator removing the elements of an `IndexedList` that match a
/// predicate.
///
/// This `struct` is created by [`IndexedList::drain_filter`].
pub struct DrainFilter<'a, T: 'a, F: 'a>
where
    F: FnMut(&mut T) -> bool,
{
    list: &'a mut IndexedList<T>,
    cursor: Cursor,
    filter: F,
}

impl<'a, T, F> DrainFilter<'a, T, F>
where
    F: FnMut(&mut T) -> bool,
{
    pub(crate) fn new(list: &'a mut IndexedList<T>, filter: F) -> Self {
        let cursor = list.cursor_front();
        Self {
            list,
            cursor,
            filter,
        }
    }
}

impl<T, F> Iterator for DrainFilter<'_, T, F>
where
    F: FnMut(&mut T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // only this cursor changes the list, so it never conflicts
            let element = self.cursor.next_mut(self.list).ok()??;
            if (self.filter)(element) {
                return self.cursor.remove(self.list).ok();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.list.len() - self.cursor.next_index()))
    }
}

impl<T, F> Drop for DrainFilter<'_, T, F>
where
    F: FnMut(&mut T) -> bool,
{
    fn drop(&mut self) {
        self.for_each(drop);
    }
}

impl<T: fmt::Debug, F> fmt::Debug for DrainFilter<'_, T, F>
where
    F: FnMut(&mut T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DrainFilter").field(self.list).finish()
    }
}
