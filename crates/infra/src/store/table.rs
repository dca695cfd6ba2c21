use std::collections::BTreeMap;

use lingoledger_core::{DomainError, DomainResult, SequenceId};

/// Id-keyed rows plus the store's id sequence.
///
/// The sequence is strictly monotonic: removing a row never frees its id, and
/// inserting with an explicit id moves the sequence past it. Once an id of
/// `u64::MAX` has been handed out the sequence is exhausted.
#[derive(Debug, Clone)]
pub struct Table<K, V> {
    rows: BTreeMap<K, V>,
    next: Option<u64>,
}

impl<K: SequenceId, V> Table<K, V> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next: Some(0),
        }
    }

    /// Reserve an id: the requested one if given, otherwise the next in sequence.
    pub fn allocate(&mut self, requested: Option<K>) -> DomainResult<K> {
        let id = match requested {
            Some(id) => id,
            None => self
                .next
                .map(K::from_sequence)
                .ok_or_else(|| DomainError::storage("id sequence exhausted"))?,
        };
        if let Some(next) = self.next {
            if id.sequence() >= next {
                self.next = id.sequence().checked_add(1);
            }
        }
        Ok(id)
    }

    pub fn put(&mut self, id: K, value: V) -> Option<V> {
        self.rows.insert(id, value)
    }

    pub fn get(&self, id: &K) -> Option<&V> {
        self.rows.get(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.rows.contains_key(id)
    }

    pub fn remove(&mut self, id: &K) -> Option<V> {
        self.rows.remove(id)
    }

    /// Rows in id order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn sequence(&self) -> Option<u64> {
        self.next
    }

    pub(crate) fn rewind(&mut self, next: Option<u64>) {
        self.next = next;
    }
}

impl<K: SequenceId, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingoledger_core::InvoiceId;
    use proptest::prelude::*;

    #[test]
    fn ids_follow_insertion_sequence() {
        let mut table: Table<InvoiceId, &str> = Table::new();
        for (n, value) in ["a", "b", "c"].into_iter().enumerate() {
            let id = table.allocate(None).unwrap();
            assert_eq!(id, InvoiceId::new(n as u64));
            table.put(id, value);
        }
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let mut table: Table<InvoiceId, &str> = Table::new();
        let a = table.allocate(None).unwrap();
        table.put(a, "a");
        let b = table.allocate(None).unwrap();
        table.put(b, "b");

        table.remove(&a);
        let c = table.allocate(None).unwrap();
        assert_eq!(c, InvoiceId::new(2));
        assert!(table.contains(&b));
    }

    #[test]
    fn explicit_id_advances_sequence() {
        let mut table: Table<InvoiceId, &str> = Table::new();
        let five = table.allocate(Some(InvoiceId::new(5))).unwrap();
        table.put(five, "five");
        assert_eq!(table.allocate(None).unwrap(), InvoiceId::new(6));

        // A lower explicit id does not move the sequence backwards.
        table.allocate(Some(InvoiceId::new(1))).unwrap();
        assert_eq!(table.allocate(None).unwrap(), InvoiceId::new(7));
    }

    #[test]
    fn sequence_exhausted_after_max_id() {
        let mut table: Table<InvoiceId, &str> = Table::new();
        let max = table.allocate(Some(InvoiceId::new(u64::MAX))).unwrap();
        table.put(max, "last");

        let err = table.allocate(None).unwrap_err();
        assert_eq!(err, DomainError::storage("id sequence exhausted"));
        assert_eq!(table.get(&max), Some(&"last"));

        // Explicit ids below the top remain usable.
        assert_eq!(
            table.allocate(Some(InvoiceId::new(3))).unwrap(),
            InvoiceId::new(3)
        );
        assert!(table.allocate(None).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: across any interleaving of inserts and deletes, generated
        /// ids are strictly increasing and never collide with a live row.
        #[test]
        fn generated_ids_never_collide(ops in prop::collection::vec(any::<bool>(), 1..64)) {
            let mut table: Table<InvoiceId, ()> = Table::new();
            let mut last: Option<InvoiceId> = None;

            for insert in ops {
                if insert || table.is_empty() {
                    let id = table.allocate(None).unwrap();
                    prop_assert!(!table.contains(&id));
                    if let Some(prev) = last {
                        prop_assert!(id > prev);
                    }
                    table.put(id, ());
                    last = Some(id);
                } else if let Some(first) = table.rows.keys().next().copied() {
                    table.remove(&first);
                }
            }
        }
    }
}
