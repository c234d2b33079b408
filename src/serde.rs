//! `serde` support: an [`IndexedList`] is persisted as a plain sequence of its
//! elements in order. The finger index is not part of the layout; it is
//! rebuilt, evenly spaced over the whole run, when the list is read back.

use crate::IndexedList;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

impl<T: Serialize> Serialize for IndexedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

struct ListVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ListVisitor<T> {
    type Value = IndexedList<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        // size hints are untrusted input
        let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        let mut list = IndexedList::with_capacity(elements.len());
        list.append_all(elements);
        Ok(list)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for IndexedList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ListVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use crate::IndexedList;

    #[test]
    fn json_round_trip() {
        let mut list: IndexedList<_> = (0..50).collect();
        list.remove_range(10..20).unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.starts_with("[0,1,2,"));

        let back: IndexedList<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
        assert_eq!(back.finger_count(), list.finger_count());
        back.check_invariants().unwrap();
    }

    #[test]
    fn empty_and_nested() {
        let empty: IndexedList<String> = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());
        empty.check_invariants().unwrap();

        let nested: IndexedList<IndexedList<u8>> = serde_json::from_str("[[1,2],[],[3]]").unwrap();
        assert_eq!(nested.len(), 3);
        assert_eq!(nested.get(0).unwrap().to_vec(), vec![1, 2]);
        assert_eq!(serde_json::to_string(&nested).unwrap(), "[[1,2],[],[3]]");
    }

    #[test]
    fn rejects_non_sequences() {
        assert!(serde_json::from_str::<IndexedList<i32>>("{\"a\":1}").is_err());
        assert!(serde_json::from_str::<IndexedList<i32>>("[1,\"two\"]").is_err());
    }
}
