use std::sync::Arc;

use crate::buffer::BufferPoolManager;
use crate::catalog::schema::Schema;
use crate::common::rid::Rid;
use crate::concurrency::transaction::Transaction;
use crate::container::ExtendibleHashTable;
use crate::storage::index::{GenericComparator, GenericKey, Index, IndexMeta};
use crate::storage::table::tuple::Tuple;

/// An index over a table's key columns, backed by the extendible hash
/// table. Keys are the serialized key columns padded into a
/// [`GenericKey`]; values are the record ids of the indexed tuples.
pub struct HashTableIndex<const N: usize> {
    meta: IndexMeta,
    table_schema: Schema,
    container: ExtendibleHashTable<GenericKey<N>, Rid, GenericComparator<N>>,
}

impl<const N: usize> HashTableIndex<N> {
    pub fn new(
        meta: IndexMeta,
        table_schema: Schema,
        buffer_pool_manager: Arc<dyn BufferPoolManager>,
    ) -> Option<Self> {
        assert!(
            meta.key_schema.fixed_length() <= N,
            "key schema of {} bytes does not fit index key width {}",
            meta.key_schema.fixed_length(),
            N
        );
        let container = ExtendibleHashTable::new(buffer_pool_manager, GenericComparator)?;
        Some(Self {
            meta,
            table_schema,
            container,
        })
    }

    fn key_for(&self, tuple: &Tuple) -> GenericKey<N> {
        let key_tuple = tuple.key_tuple(
            &self.table_schema,
            &self.meta.key_attrs,
            &self.meta.key_schema,
        );
        GenericKey::from_tuple(&key_tuple)
    }
}

impl<const N: usize> Index for HashTableIndex<N> {
    fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    fn insert_entry(&self, tuple: &Tuple, rid: Rid, _txn: &Transaction) -> bool {
        self.container.insert(&self.key_for(tuple), &rid)
    }

    fn delete_entry(&self, tuple: &Tuple, rid: Rid, _txn: &Transaction) -> bool {
        self.container.remove(&self.key_for(tuple), &rid)
    }

    fn scan_key(&self, key: &Tuple, _txn: &Transaction) -> Vec<Rid> {
        let key = GenericKey::from_tuple(key);
        let mut result = vec![];
        self.container.get_value(&key, &mut result);
        result
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::buffer::BufferPoolInstance;
    use crate::catalog::column::{Column, DataType};
    use crate::dbtype::Value;
    use crate::storage::disk::{DiskManager, DiskScheduler};

    fn table_schema() -> Schema {
        Schema::new(vec![
            Column::new("id".to_string(), DataType::Integer),
            Column::new("score".to_string(), DataType::Integer),
        ])
    }

    fn new_index(dir: &TempDir) -> HashTableIndex<8> {
        let db_name = dir.path().join("test.db");
        let disk_manager = Arc::new(DiskManager::new(db_name.to_str().unwrap()));
        let scheduler = Arc::new(DiskScheduler::new(disk_manager));
        let bpm: Arc<dyn BufferPoolManager> = Arc::new(BufferPoolInstance::new(20, scheduler));
        let schema = table_schema();
        let meta = IndexMeta {
            name: "idx_id".to_string(),
            table_name: "t".to_string(),
            key_attrs: vec![0],
            key_schema: schema.project(&[0]),
        };
        HashTableIndex::new(meta, schema, bpm).unwrap()
    }

    #[test]
    fn test_index_insert_scan_delete() {
        let dir = TempDir::new("test").unwrap();
        let index = new_index(&dir);
        let schema = table_schema();
        let txn = Transaction::new(0);

        let tuple = Tuple::from_values(&[Value::integer(42), Value::integer(9)], &schema);
        let rid = Rid::new(1, 3);
        assert!(index.insert_entry(&tuple, rid, &txn));
        // identical entry is rejected
        assert!(!index.insert_entry(&tuple, rid, &txn));

        let key = tuple.key_tuple(&schema, &[0], &index.meta().key_schema);
        assert_eq!(index.scan_key(&key, &txn), vec![rid]);

        assert!(index.delete_entry(&tuple, rid, &txn));
        assert!(index.scan_key(&key, &txn).is_empty());
    }
}
