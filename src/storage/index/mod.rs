use std::cmp::Ordering;

use crate::catalog::schema::Schema;
use crate::common::rid::Rid;
use crate::concurrency::transaction::Transaction;
use crate::storage::table::tuple::Tuple;

pub mod generic_key;
pub mod hash_index;

pub use generic_key::{GenericComparator, GenericKey};
pub use hash_index::HashTableIndex;

/// Ordering of keys stored in an index. Only equality is significant for the
/// extendible hash table, but comparators return a full ordering so other
/// index types can share them.
pub trait KeyComparator<K>: Send + Sync {
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntComparator;

impl KeyComparator<i32> for IntComparator {
    fn compare(&self, lhs: &i32, rhs: &i32) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Describes which table columns an index covers.
#[derive(Debug, Clone)]
pub struct IndexMeta {
    pub name: String,
    pub table_name: String,
    pub key_attrs: Vec<usize>,
    pub key_schema: Schema,
}

/// The mutation surface executors use to keep indexes in sync with their
/// table heap.
pub trait Index: Send + Sync {
    fn meta(&self) -> &IndexMeta;

    /// Inserts an entry for the given tuple. Returns false when an identical
    /// entry already exists.
    fn insert_entry(&self, tuple: &Tuple, rid: Rid, txn: &Transaction) -> bool;

    /// Removes the entry for the given tuple.
    fn delete_entry(&self, tuple: &Tuple, rid: Rid, txn: &Transaction) -> bool;

    /// Returns the record ids stored under the tuple's key.
    fn scan_key(&self, key: &Tuple, txn: &Transaction) -> Vec<Rid>;
}
