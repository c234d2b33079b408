//! This crate provides an indexed doubly-linked list: a linked list that also
//! answers positional queries quickly.
//!
//! The [`IndexedList`] keeps a small index of *fingers*, cached
//! `(node, index)` pairs, next to its chain of nodes. With `ceil(sqrt(n))`
//! fingers spread over the list, reading or editing the element at any index
//! takes *O*(√*n*) amortized time instead of the *O*(*n*) walk of a plain
//! linked list, while pushing and popping at either end stays *O*(1)
//! amortized.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use finger_list::IndexedList;
//!
//! let mut list: IndexedList<_> = (1..=100).collect();
//!
//! assert_eq!(list.get(41), Some(&42));
//! list.insert(50, 0).unwrap();
//! assert_eq!(list.remove(50), Ok(0));
//!
//! list.remove_range(29..70).unwrap(); // drops the values 30..=70
//! assert_eq!(list.len(), 59);
//! assert_eq!(list.get(29), Some(&71));
//! ```
//!
//! # Memory Layout
//!
//! ```text
//!   index:  0     1     2     3     4     5     6     7    (8)
//!   chain: [a] ⇄ [b] ⇄ [c] ⇄ [d] ⇄ [e] ⇄ [f] ⇄ [g] ⇄ [h]
//!           ↑                 ↑                 ↑           ↑
//! fingers: (a,0)             (d,3)             (g,6)      (-,8)
//! ```
//!
//! Nodes live in an arena and link to each other by integer ids, so the list
//! owns its elements without raw pointers between nodes. The `IndexedList`
//! contains:
//! - the chain of nodes, with links to its first and last node and its length;
//! - the finger index, sorted by index and terminated by a sentinel finger
//!   whose index is always the length of the list;
//! - a version counter, bumped on every structural change.
//!
//! Locating index *i* binary-searches the finger index for the fingers
//! around *i*, then walks from whichever of them (or of the two ends of the
//! chain) is nearest. Every structural mutation repairs the finger index
//! before it returns, and every lookup moves the finger that served it
//! towards the middle of its segment. Shared lookups do so through a
//! `RefCell`, so an `IndexedList` can be sent to another thread but not
//! shared between threads.
//!
//! # Iteration
//!
//! Iterating over a list is by the [`Iter`] and [`IterMut`] iterators. These are
//! double-ended iterators and iterate the list like an array. [`IterMut`]
//! provides mutability of the elements (but not the linked structure of
//! the list). A [`Splitter`] partitions the list into batches that can be
//! handed to several threads; the batches read only the node chain.
//!
//! ## Examples
//!
//! ```
//! use finger_list::IndexedList;
//!
//! let mut list = IndexedList::from([1, 2, 3]);
//! let mut iter = list.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next_back(), Some(&3));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), None);
//!
//! list.iter_mut().for_each(|item| *item *= 2);
//! assert_eq!(list.into_iter().collect::<Vec<_>>(), vec![2, 4, 6]);
//! ```
//!
//! # Cursors
//!
//! A [`Cursor`] sits between two elements and moves in both directions. It
//! does not borrow the list: every call takes the list as an argument, and a
//! cursor that sees the list changed by anyone else fails with
//! [`ListError::Conflict`].
//!
//! ```
//! use finger_list::{IndexedList, ListError};
//!
//! let mut list = IndexedList::from([1, 2, 3, 4]);
//! let mut cursor = list.cursor(1).unwrap();
//!
//! assert_eq!(cursor.next(&list), Ok(Some(&2)));
//! assert_eq!(cursor.remove(&mut list), Ok(2));
//! cursor.insert(&mut list, 5).unwrap();
//! assert_eq!(list.to_vec(), vec![1, 5, 3, 4]);
//!
//! let stale = list.cursor_front();
//! list.push_back(6);
//! assert!(matches!(stale.clone().next(&list), Err(ListError::Conflict { .. })));
//! ```
//!
//! # Views
//!
//! [`IndexedList::sub_list`] borrows a range of the list as a [`SubList`],
//! which supports the positional operations of the list itself, translated
//! to the range.
//!
//! ```
//! use finger_list::IndexedList;
//!
//! let mut list: IndexedList<_> = (0..10).collect();
//! let mut view = list.sub_list(2..5).unwrap();
//! assert_eq!(view.remove(0), Ok(2));
//! view.push_back(42);
//! assert_eq!(view.to_vec(), vec![3, 4, 42]);
//! drop(view);
//! assert_eq!(list.to_vec(), vec![0, 1, 3, 4, 42, 5, 6, 7, 8, 9]);
//! ```
//!
//! # Features
//!
//! - `serde` (default): `Serialize` and `Deserialize` for [`IndexedList`],
//!   encoded as a plain sequence.

mod error;
pub mod list;
#[cfg(feature = "serde")]
mod serde;
pub mod traits;

#[doc(inline)]
pub use error::{InvariantViolation, ListError};
#[doc(inline)]
pub use list::cursor::Cursor;
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter, IterMut, Splitter, MIN_BATCH_SIZE};
#[doc(inline)]
pub use list::view::SubList;
#[doc(inline)]
pub use list::{recommended_fingers, Drain, DrainFilter, IndexedList};
#[doc(inline)]
pub use traits::{DoubleEndedQueue, IndexedSequence};
