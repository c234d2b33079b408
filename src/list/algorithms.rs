use crate::list::node::NodeId;
use crate::list::IndexedList;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

mod drain;
mod sort;

pub use drain::{Drain, DrainFilter};

impl<T: PartialEq> PartialEq for IndexedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T: Eq> Eq for IndexedList<T> {}

impl<T: PartialOrd> PartialOrd for IndexedList<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord> Ord for IndexedList<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: Clone> Clone for IndexedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: Hash> Hash for IndexedList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for elt in self {
            elt.hash(state);
        }
        self.len().hash(state);
    }
}

impl<T, const N: usize> From<[T; N]> for IndexedList<T> {
    fn from(array: [T; N]) -> Self {
        array.into_iter().collect()
    }
}

impl<T> IndexedList<T> {
    /// Nodes paired with their indices, head to tail.
    fn nodes(&self) -> impl DoubleEndedIterator<Item = (usize, NodeId)> + '_ {
        let chain = &self.chain;
        let forward = std::iter::successors(chain.head(), move |&node| chain.next(node));
        let backward = std::iter::successors(chain.tail(), move |&node| chain.prev(node));
        let len = self.len();
        Nodes {
            forward,
            backward,
            front: 0,
            back: len,
        }
    }

    /// Returns `true` if the `IndexedList` contains an element equal to the
    /// given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list = IndexedList::from([0, 1, 2]);
    ///
    /// assert_eq!(list.contains(&0), true);
    /// assert_eq!(list.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }

    /// Returns the index of the first element equal to `x`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list = IndexedList::from(['a', 'b', 'a']);
    /// assert_eq!(list.position(&'a'), Some(0));
    /// assert_eq!(list.position(&'z'), None);
    /// ```
    pub fn position(&self, x: &T) -> Option<usize>
    where
        T: PartialEq<T>,
    {
        self.iter().position(|e| e == x)
    }

    /// Returns the index of the last element equal to `x`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let list = IndexedList::from(['a', 'b', 'a']);
    /// assert_eq!(list.rposition(&'a'), Some(2));
    /// ```
    pub fn rposition(&self, x: &T) -> Option<usize>
    where
        T: PartialEq<T>,
    {
        self.iter().rposition(|e| e == x)
    }

    /// Removes the first element equal to `x` and returns it.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time. The found node is
    /// unlinked where it is, without a second lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::from([1, 2, 1, 2]);
    /// assert_eq!(list.remove_first_occurrence(&2), Some(2));
    /// assert_eq!(list.remove_first_occurrence(&3), None);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 1, 2]);
    /// ```
    pub fn remove_first_occurrence(&mut self, x: &T) -> Option<T>
    where
        T: PartialEq<T>,
    {
        let (index, node) = self
            .nodes()
            .find(|&(_, node)| self.chain.element(node) == x)?;
        Some(self.unlink_at(index, node))
    }

    /// Removes the last element equal to `x` and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list = IndexedList::from([1, 2, 1, 2]);
    /// assert_eq!(list.remove_last_occurrence(&1), Some(1));
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 2]);
    /// ```
    pub fn remove_last_occurrence(&mut self, x: &T) -> Option<T>
    where
        T: PartialEq<T>,
    {
        let (index, node) = self
            .nodes()
            .rev()
            .find(|&(_, node)| self.chain.element(node) == x)?;
        Some(self.unlink_at(index, node))
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = (0..10).collect();
    /// list.retain(|x| x % 3 == 0);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 3, 6, 9]);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.drain_filter(|x| !f(x)).for_each(drop);
    }

    /// Removes all elements from the front, yielding them. Elements the
    /// iterator did not reach are dropped with it.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = (0..5).collect();
    /// assert_eq!(list.drain().take(2).collect::<Vec<_>>(), vec![0, 1]);
    /// assert!(list.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain::new(self)
    }

    /// Creates an iterator which uses a closure to determine if an element
    /// should be removed, yielding the removed elements. Elements left
    /// unvisited when the iterator is dropped are still filtered.
    ///
    /// # Examples
    ///
    /// ```
    /// use finger_list::IndexedList;
    ///
    /// let mut list: IndexedList<_> = (1..=6).collect();
    /// let evens: Vec<_> = list.drain_filter(|x| *x % 2 == 0).collect();
    /// assert_eq!(evens, vec![2, 4, 6]);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
    /// ```
    pub fn drain_filter<F>(&mut self, filter: F) -> DrainFilter<'_, T, F>
    where
        F: FnMut(&mut T) -> bool,
    {
        DrainFilter::new(self, filter)
    }

    /// Copies the elements into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

/// Index-tagged node walk from both ends, bounded by the list length.
struct Nodes<F, B> {
    forward: F,
    backward: B,
    front: usize,
    back: usize,
}

impl<F, B> Iterator for Nodes<F, B>
where
    F: Iterator<Item = NodeId>,
    B: Iterator<Item = NodeId>,
{
    type Item = (usize, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let node = self.forward.next()?;
        self.front += 1;
        Some((self.front - 1, node))
    }
}

impl<F, B> DoubleEndedIterator for Nodes<F, B>
where
    F: Iterator<Item = NodeId>,
    B: Iterator<Item = NodeId>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let node = self.backward.next()?;
        self.back -= 1;
        Some((self.back, node))
    }
}
