//! Capability traits shared by [`IndexedList`] and its [`SubList`] views.
//!
//! Code that only needs positional access, or only needs the two ends, can be
//! written once against these traits and run on a whole list as well as on a
//! range of it.
//!
//! ```
//! use finger_list::{DoubleEndedQueue, IndexedList, IndexedSequence};
//!
//! fn rotate<Q: DoubleEndedQueue<i32>>(queue: &mut Q) {
//!     if let Some(front) = queue.pop_front() {
//!         queue.push_back(front);
//!     }
//! }
//!
//! fn swap_ends<S: IndexedSequence<i32>>(seq: &mut S) {
//!     let last = seq.len() - 1;
//!     let a = seq.remove(0).unwrap();
//!     let b = seq.set(last - 1, a).unwrap();
//!     seq.insert(0, b).unwrap();
//! }
//!
//! let mut list: IndexedList<_> = (0..6).collect();
//! rotate(&mut list);
//! rotate(&mut list.sub_list(1..4).unwrap());
//! assert_eq!(list.to_vec(), vec![1, 3, 4, 2, 5, 0]);
//!
//! swap_ends(&mut list);
//! assert_eq!(list.to_vec(), vec![0, 3, 4, 2, 5, 1]);
//! ```

use crate::{IndexedList, ListError, SubList};

/// A sequence with positional access.
pub trait IndexedSequence<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&T>;

    fn get_mut(&mut self, index: usize) -> Option<&mut T>;

    /// Replaces the element at `index`, returning the old one.
    fn set(&mut self, index: usize, element: T) -> Result<T, ListError>;

    /// Inserts `element` at `position`, shifting later elements right.
    fn insert(&mut self, position: usize, element: T) -> Result<(), ListError>;

    /// Removes and returns the element at `index`.
    fn remove(&mut self, index: usize) -> Result<T, ListError>;
}

/// A sequence that can be pushed to, popped from and peeked at both ends.
pub trait DoubleEndedQueue<T> {
    fn push_front(&mut self, element: T);

    fn push_back(&mut self, element: T);

    fn pop_front(&mut self) -> Option<T>;

    fn pop_back(&mut self) -> Option<T>;

    fn front(&self) -> Option<&T>;

    fn back(&self) -> Option<&T>;

    /// Like [`pop_front`](Self::pop_front), but an empty queue is an error.
    fn remove_first(&mut self) -> Result<T, ListError> {
        self.pop_front().ok_or(ListError::Empty)
    }

    /// Like [`pop_back`](Self::pop_back), but an empty queue is an error.
    fn remove_last(&mut self) -> Result<T, ListError> {
        self.pop_back().ok_or(ListError::Empty)
    }
}

macro_rules! forward_traits {
    ($($ty:ty),* $(,)?) => {$(
        impl<T> IndexedSequence<T> for $ty {
            #[inline]
            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            #[inline]
            fn get(&self, index: usize) -> Option<&T> {
                <$ty>::get(self, index)
            }

            #[inline]
            fn get_mut(&mut self, index: usize) -> Option<&mut T> {
                <$ty>::get_mut(self, index)
            }

            #[inline]
            fn set(&mut self, index: usize, element: T) -> Result<T, ListError> {
                <$ty>::set(self, index, element)
            }

            #[inline]
            fn insert(&mut self, position: usize, element: T) -> Result<(), ListError> {
                <$ty>::insert(self, position, element)
            }

            #[inline]
            fn remove(&mut self, index: usize) -> Result<T, ListError> {
                <$ty>::remove(self, index)
            }
        }

        impl<T> DoubleEndedQueue<T> for $ty {
            #[inline]
            fn push_front(&mut self, element: T) {
                <$ty>::push_front(self, element)
            }

            #[inline]
            fn push_back(&mut self, element: T) {
                <$ty>::push_back(self, element)
            }

            #[inline]
            fn pop_front(&mut self) -> Option<T> {
                <$ty>::pop_front(self)
            }

            #[inline]
            fn pop_back(&mut self) -> Option<T> {
                <$ty>::pop_back(self)
            }

            #[inline]
            fn front(&self) -> Option<&T> {
                <$ty>::front(self)
            }

            #[inline]
            fn back(&self) -> Option<&T> {
                <$ty>::back(self)
            }
        }
    )*};
}

forward_traits!(IndexedList<T>, SubList<'_, T>);

#[cfg(test)]
mod tests {
    use super::*;

    fn fill<S: IndexedSequence<char>>(seq: &mut S, text: &str) {
        for c in text.chars() {
            let len = seq.len();
            seq.insert(len, c).unwrap();
        }
    }

    fn drain_both_ends<Q: DoubleEndedQueue<i32>>(queue: &mut Q) -> Vec<i32> {
        let mut out = Vec::new();
        loop {
            match (queue.pop_front(), queue.pop_back()) {
                (Some(a), Some(b)) => out.extend([a, b]),
                (Some(a), None) => out.push(a),
                _ => break,
            }
        }
        out
    }

    #[test]
    fn sequence_through_the_trait() {
        let mut list = IndexedList::new();
        fill(&mut list, "abc");
        assert_eq!(IndexedSequence::len(&list), 3);
        assert_eq!(IndexedSequence::get(&list, 1), Some(&'b'));
        assert_eq!(IndexedSequence::set(&mut list, 1, 'x'), Ok('b'));
        assert_eq!(IndexedSequence::remove(&mut list, 0), Ok('a'));
        assert!(IndexedSequence::remove(&mut list, 5).is_err());

        {
            let mut view = list.sub_list(1..).unwrap();
            fill(&mut view, "de");
            assert_eq!(IndexedSequence::get(&view, 2), Some(&'e'));
        }
        assert_eq!(list.iter().collect::<String>(), "xcde");
    }

    #[test]
    fn queue_through_the_trait() {
        let mut list: IndexedList<_> = (0..5).collect();
        {
            let mut view = list.sub_list(1..4).unwrap();
            assert_eq!(DoubleEndedQueue::front(&view), Some(&1));
            assert_eq!(DoubleEndedQueue::back(&view), Some(&3));
            assert_eq!(drain_both_ends(&mut view), vec![1, 3, 2]);
            assert_eq!(DoubleEndedQueue::remove_first(&mut view), Err(ListError::Empty));
        }
        assert_eq!(list.to_vec(), vec![0, 4]);
        assert_eq!(drain_both_ends(&mut list), vec![0, 4]);
        assert_eq!(DoubleEndedQueue::remove_last(&mut list), Err(ListError::Empty));
    }
}
