use crate::list::node::{node_at, Chain, NodeId, Slot};
use crate::list::IndexedList;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Smallest number of elements a [`Splitter`] hands out per batch.
pub const MIN_BATCH_SIZE: usize = 64;

/// An iterator over the elements of an `IndexedList`.
///
/// It walks the nodes `front..=back` from both ends; `len` counts the nodes
/// that are left, so the two ends never cross.
///
/// # Examples
///
/// ```compile_fail
/// use finger_list::IndexedList;
///
/// let mut list: IndexedList<_> = [1, 2, 3].into_iter().collect();
/// let mut iter = list.iter();
///
/// // Won't compile, because list is already borrowed immutably.
/// list.push_back(4);
/// println!("{:?}", iter.next());
/// ```
pub struct Iter<'a, T: 'a> {
    chain: &'a Chain<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    len: usize,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(chain: &'a Chain<T>) -> Self {
        Self::range(chain, chain.head(), chain.tail(), chain.len())
    }

    /// Iterate over the `len` nodes `front..=back`.
    pub(crate) fn range(
        chain: &'a Chain<T>,
        front: Option<NodeId>,
        back: Option<NodeId>,
        len: usize,
    ) -> Self {
        Self {
            chain,
            front,
            back,
            len,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.front?;
        self.front = self.chain.next(node);
        self.len -= 1;
        Some(self.chain.element(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.back?;
        self.back = self.chain.prev(node);
        self.len -= 1;
        Some(self.chain.element(node))
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// A mutable iterator over the elements of an `IndexedList`.
///
/// `IterMut` hands out `&'a mut T` to distinct nodes, so it keeps a raw
/// pointer to the arena storage instead of a `&'a mut Chain<T>`. A phantom
/// marker of `&'a mut Chain<T>` keeps the list borrowed.
///
/// # Examples
///
/// The list is not readable while an `IterMut` is alive.
/// ```compile_fail
/// use finger_list::IndexedList;
///
/// let mut list: IndexedList<_> = [1, 2, 3].into_iter().collect();
/// let mut iter = list.iter_mut();
/// println!("{:?}", list.back());
/// println!("{:?}", iter.next());
/// ```
pub struct IterMut<'a, T: 'a> {
    slots: *mut Slot<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    len: usize,
    _marker: PhantomData<&'a mut Chain<T>>,
}

impl<'a, T: 'a> IterMut<'a, T> {
    pub(crate) fn new(chain: &'a mut Chain<T>) -> Self {
        let (front, back, len) = (chain.head(), chain.tail(), chain.len());
        Self::range(chain, front, back, len)
    }

    /// Iterate mutably over the `len` nodes `front..=back`.
    pub(crate) fn range(
        chain: &'a mut Chain<T>,
        front: Option<NodeId>,
        back: Option<NodeId>,
        len: usize,
    ) -> Self {
        Self {
            slots: chain.arena_mut().as_mut_ptr(),
            front,
            back,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for IterMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("len", &self.len).finish()
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let id = self.front?;
        // SAFETY: the arena is mutably borrowed for `'a` and cannot
        // reallocate. `len` keeps `front` and `back` from crossing, so every
        // node is handed out at most once.
        let node = unsafe { node_at(self.slots, id) };
        self.front = node.next;
        self.len -= 1;
        Some(&mut node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let id = self.back?;
        // SAFETY: see `next`.
        let node = unsafe { node_at(self.slots, id) };
        self.back = node.prev;
        self.len -= 1;
        Some(&mut node.element)
    }
}

impl<'a, T: 'a> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T: 'a> FusedIterator for IterMut<'a, T> {}

/// An owning iterator over the elements of an `IndexedList`.
///
/// This `struct` is created by the [`into_iter`] method on [`IndexedList`]
/// (provided by the `IntoIterator` trait). See its documentation for more.
///
/// [`into_iter`]: IndexedList::into_iter
pub struct IntoIter<T> {
    list: IndexedList<T>,
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("list", &self.list)
            .finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.list.len();
        (len, Some(len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for IndexedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a IndexedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut IndexedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// The fingers of the collected list are evenly spaced.
impl<T> FromIterator<T> for IndexedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut list = IndexedList::with_capacity(iter.size_hint().0);
        list.append_all(iter);
        list
    }
}

impl<T> Extend<T> for IndexedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_all(iter);
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for IndexedList<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

/// A splittable traversal over a range of an `IndexedList`.
///
/// [`try_split`](Splitter::try_split) hands out the first half of the
/// remaining range as a new `Splitter`, until a half would hold fewer than
/// the minimum batch size. The halves borrow only the node chain, never the
/// finger index, so they can be consumed on different threads. Splitting
/// walks from the start of the remaining range to its middle.
///
/// # Examples
///
/// ```
/// use finger_list::IndexedList;
///
/// let list: IndexedList<u64> = (0..10_000).collect();
/// let mut batches = vec![list.splitter()];
/// while let Some(prefix) = batches.last_mut().and_then(|s| s.try_split()) {
///     batches.insert(batches.len() - 1, prefix);
/// }
/// let total: u64 = std::thread::scope(|scope| {
///     let handles: Vec<_> = batches
///         .into_iter()
///         .map(|batch| scope.spawn(move || batch.sum::<u64>()))
///         .collect();
///     handles.into_iter().map(|h| h.join().unwrap()).sum()
/// });
/// assert_eq!(total, (0..10_000).sum());
/// ```
pub struct Splitter<'a, T: 'a> {
    chain: &'a Chain<T>,
    /// The node at `start`, `None` once the range is exhausted.
    node: Option<NodeId>,
    start: usize,
    end: usize,
    min_batch: usize,
}

impl<'a, T: 'a> Splitter<'a, T> {
    pub(crate) fn new(chain: &'a Chain<T>) -> Self {
        Self {
            chain,
            node: chain.head(),
            start: 0,
            end: chain.len(),
            min_batch: MIN_BATCH_SIZE,
        }
    }

    /// Sets the smallest number of elements a split may produce.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list: IndexedList<_> = (0..10).collect();
    /// assert!(list.splitter().try_split().is_none());
    ///
    /// let mut right = list.splitter().with_min_batch(2);
    /// let left = right.try_split().unwrap();
    /// assert_eq!(left.collect::<Vec<_>>(), vec![&0, &1, &2, &3, &4]);
    /// assert_eq!(right.len(), 5);
    /// ```
    pub fn with_min_batch(mut self, min_batch: usize) -> Self {
        self.min_batch = min_batch.max(1);
        self
    }

    /// Splits off the first half of the remaining range, or returns `None`
    /// if either half would be smaller than the minimum batch size.
    pub fn try_split(&mut self) -> Option<Splitter<'a, T>> {
        let remaining = self.end - self.start;
        if remaining < 2 * self.min_batch {
            return None;
        }
        let first = self.node?;
        let mid = self.start + remaining / 2;
        let prefix = Splitter {
            chain: self.chain,
            node: Some(first),
            start: self.start,
            end: mid,
            min_batch: self.min_batch,
        };
        self.node = Some(self.chain.walk_forward(first, remaining / 2));
        self.start = mid;
        Some(prefix)
    }
}

impl<T> fmt::Debug for Splitter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Splitter")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("min_batch", &self.min_batch)
            .finish()
    }
}

impl<'a, T: 'a> Iterator for Splitter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }
        let node = self.node?;
        self.node = self.chain.next(node);
        self.start += 1;
        Some(self.chain.element(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<'a, T: 'a> ExactSizeIterator for Splitter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Splitter<'a, T> {}

unsafe impl<T: Send> Send for IterMut<'_, T> {}

unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::IndexedList;
    use std::fmt::Debug;

    #[test]
    fn test_iter() {
        macro_rules! test_iter {
            ($FN:ident, $ITER:ident $(, $REV:ident)?) => {
                fn $FN<T, I>(input: I, mid: usize)
                where
                    T: Eq + Debug + Clone,
                    I: IntoIterator<Item = T>,
                {
                    #[allow(unused_mut)]
                    let mut vec: Vec<T> = input.into_iter().collect();
                    #[allow(unused_mut)]
                    let mut list: IndexedList<T> = vec.clone().into_iter().collect();
                    let len = vec.len();
                    let mut iter = list.$ITER() $( .$REV() )?;
                    for (i, item) in vec.$ITER() $( .$REV() )?.enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - i - 1);
                    }
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next_back(), None);
                    assert_eq!(iter.len(), 0);

                    let mut iter = list.$ITER() $( .$REV() )?;
                    for (i, item) in vec.$ITER() $( .$REV() )? .take(mid).enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - i - 1);
                    }
                    let mut iter = iter.rev();
                    for (i, item) in vec.$ITER() $( .$REV() )? .skip(mid).rev().enumerate() {
                        assert_eq!(iter.next(), Some(item));
                        assert_eq!(iter.len(), len - mid - i - 1);
                    }
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next(), None);
                    assert_eq!(iter.next_back(), None);
                    assert_eq!(iter.len(), 0);
                }
            };
        }
        test_iter!(test_iter, iter);
        test_iter!(test_iter_mut, iter_mut);
        test_iter!(test_back_iter, iter, rev);
        test_iter!(test_back_iter_mut, iter_mut, rev);

        fn test_case<T, I>(input: I, mid: usize)
        where
            T: Eq + Debug + Clone,
            I: IntoIterator<Item = T> + Clone,
        {
            test_iter(input.clone(), mid);
            test_iter_mut(input.clone(), mid);
            test_back_iter(input.clone(), mid);
            test_back_iter_mut(input.clone(), mid);
        }
        test_case(0..10, 10);
        test_case(0..10, 8);
        test_case(0..10, 5);
        test_case(0..10, 2);
        test_case(0..10, 0);
        test_case(0..2, 2);
        test_case(0..2, 1);
        test_case(0..2, 0);
        test_case(0..1, 1);
        test_case(0..1, 0);
        test_case(0..0, 0);
    }

    #[test]
    fn into_iter_from_both_ends() {
        let list: IndexedList<_> = (0..6).collect();
        let mut iter = list.into_iter();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(5));
        assert_eq!(iter.collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn iter_mut_after_removals_reuses_slots() {
        let mut list: IndexedList<_> = (0..8).collect();
        list.remove(2).unwrap();
        list.remove(4).unwrap();
        list.push_front(100);
        list.insert(3, 200).unwrap();
        for x in &mut list {
            *x += 1;
        }
        assert_eq!(
            list.iter().copied().collect::<Vec<_>>(),
            vec![101, 1, 2, 201, 4, 5, 7, 8]
        );
    }

    #[test]
    fn splitter_covers_range_once() {
        let list: IndexedList<_> = (0..1000).collect();
        let mut pending = vec![list.splitter().with_min_batch(10)];
        let mut batches = Vec::new();
        while let Some(mut splitter) = pending.pop() {
            match splitter.try_split() {
                Some(prefix) => {
                    pending.push(splitter);
                    pending.push(prefix);
                }
                None => batches.push(splitter),
            }
        }
        assert!(batches.iter().all(|batch| batch.len() >= 10));
        let seen: Vec<_> = batches.into_iter().flatten().copied().collect();
        assert_eq!(seen, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn extend_with_references() {
        let mut list = IndexedList::new();
        list.extend(&[1, 2, 3]);
        list.extend(vec![4, 5]);
        assert_eq!(format!("{:?}", list), "[1, 2, 3, 4, 5]");
        list.check_invariants().unwrap();
    }
}
