use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::buffer::BufferPoolManager;
use crate::catalog::schema::Schema;
use crate::common::config::{IndexOid, TableOid};
use crate::concurrency::transaction::Transaction;
use crate::storage::index::{HashTableIndex, Index, IndexMeta};
use crate::storage::table::table_heap::TableHeap;

/// Fixed byte width of hash index keys handed out by the catalog.
const INDEX_KEY_SIZE: usize = 8;

/// Everything the execution layer needs to know about a table.
pub struct TableInfo {
    pub name: String,
    pub schema: Schema,
    pub table: Arc<TableHeap>,
    pub oid: TableOid,
}

/// Everything the execution layer needs to know about an index.
pub struct IndexInfo {
    pub name: String,
    pub index: Box<dyn Index>,
    pub table_name: String,
    pub oid: IndexOid,
}

struct CatalogState {
    tables: HashMap<TableOid, Arc<TableInfo>>,
    table_names: HashMap<String, TableOid>,
    indexes: HashMap<IndexOid, Arc<IndexInfo>>,
    // table name -> index name -> oid
    index_names: HashMap<String, HashMap<String, IndexOid>>,
    next_table_oid: TableOid,
    next_index_oid: IndexOid,
}

/// Registry of tables and indexes. Table heaps and index containers are
/// created against the catalog's buffer pool and live as long as the
/// catalog does.
pub struct Catalog {
    buffer_pool_manager: Arc<dyn BufferPoolManager>,
    state: RwLock<CatalogState>,
}

impl Catalog {
    pub fn new(buffer_pool_manager: Arc<dyn BufferPoolManager>) -> Self {
        Self {
            buffer_pool_manager,
            state: RwLock::new(CatalogState {
                tables: HashMap::new(),
                table_names: HashMap::new(),
                indexes: HashMap::new(),
                index_names: HashMap::new(),
                next_table_oid: 0,
                next_index_oid: 0,
            }),
        }
    }

    /// Creates a table with an empty heap. Returns `None` when the name is
    /// taken or the heap's first page cannot be allocated.
    pub fn create_table(&self, name: &str, schema: Schema) -> Option<Arc<TableInfo>> {
        let mut state = self.state.write();
        if state.table_names.contains_key(name) {
            return None;
        }
        let table = Arc::new(TableHeap::new(
            self.buffer_pool_manager.clone(),
            schema.fixed_length(),
        )?);
        let oid = state.next_table_oid;
        state.next_table_oid += 1;

        let info = Arc::new(TableInfo {
            name: name.to_string(),
            schema,
            table,
            oid,
        });
        state.tables.insert(oid, info.clone());
        state.table_names.insert(name.to_string(), oid);
        state.index_names.insert(name.to_string(), HashMap::new());
        debug!(name, oid, "created table");
        Some(info)
    }

    pub fn table(&self, oid: TableOid) -> Option<Arc<TableInfo>> {
        self.state.read().tables.get(&oid).cloned()
    }

    pub fn table_by_name(&self, name: &str) -> Option<Arc<TableInfo>> {
        let state = self.state.read();
        let oid = state.table_names.get(name)?;
        state.tables.get(oid).cloned()
    }

    /// Creates a hash index over `key_attrs` of an existing table and
    /// backfills it from the heap.
    pub fn create_index(
        &self,
        index_name: &str,
        table_name: &str,
        key_attrs: Vec<usize>,
        txn: &Transaction,
    ) -> Option<Arc<IndexInfo>> {
        let table_info = self.table_by_name(table_name)?;
        let mut state = self.state.write();
        if state
            .index_names
            .get(table_name)
            .is_some_and(|names| names.contains_key(index_name))
        {
            return None;
        }

        let meta = IndexMeta {
            name: index_name.to_string(),
            table_name: table_name.to_string(),
            key_schema: table_info.schema.project(&key_attrs),
            key_attrs,
        };
        let index: Box<dyn Index> = Box::new(HashTableIndex::<INDEX_KEY_SIZE>::new(
            meta,
            table_info.schema.clone(),
            self.buffer_pool_manager.clone(),
        )?);
        for (rid, tuple) in table_info.table.iter() {
            index.insert_entry(&tuple, rid, txn);
        }

        let oid = state.next_index_oid;
        state.next_index_oid += 1;
        let info = Arc::new(IndexInfo {
            name: index_name.to_string(),
            index,
            table_name: table_name.to_string(),
            oid,
        });
        state.indexes.insert(oid, info.clone());
        state
            .index_names
            .get_mut(table_name)
            .unwrap()
            .insert(index_name.to_string(), oid);
        debug!(index_name, table_name, oid, "created index");
        Some(info)
    }

    pub fn index(&self, oid: IndexOid) -> Option<Arc<IndexInfo>> {
        self.state.read().indexes.get(&oid).cloned()
    }

    /// Every index registered on the given table.
    pub fn table_indexes(&self, table_name: &str) -> Vec<Arc<IndexInfo>> {
        let state = self.state.read();
        state
            .index_names
            .get(table_name)
            .map(|names| {
                names
                    .values()
                    .filter_map(|oid| state.indexes.get(oid).cloned())
                    .collect()
            })
            .unwrap_or_default()
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
    use crate::storage::table::tuple::Tuple;

    fn new_catalog(dir: &TempDir) -> Catalog {
        let db_name = dir.path().join("test.db");
        let disk_manager = Arc::new(DiskManager::new(db_name.to_str().unwrap()));
        let scheduler = Arc::new(DiskScheduler::new(disk_manager));
        let bpm: Arc<dyn BufferPoolManager> = Arc::new(BufferPoolInstance::new(50, scheduler));
        Catalog::new(bpm)
    }

    fn sample_schema() -> Schema {
        Schema::new(vec![
            Column::new("id".to_string(), DataType::Integer),
            Column::new("score".to_string(), DataType::Integer),
        ])
    }

    #[test]
    fn test_create_and_lookup_table() {
        let dir = TempDir::new("test").unwrap();
        let catalog = new_catalog(&dir);

        let info = catalog.create_table("t", sample_schema()).unwrap();
        assert_eq!(info.name, "t");
        assert!(catalog.create_table("t", sample_schema()).is_none());
        assert_eq!(catalog.table(info.oid).unwrap().oid, info.oid);
        assert_eq!(catalog.table_by_name("t").unwrap().oid, info.oid);
        assert!(catalog.table_by_name("missing").is_none());
    }

    #[test]
    fn test_create_index_backfills_existing_tuples() {
        let dir = TempDir::new("test").unwrap();
        let catalog = new_catalog(&dir);
        let txn = Transaction::new(0);
        let schema = sample_schema();

        let info = catalog.create_table("t", schema.clone()).unwrap();
        let tuple = Tuple::from_values(&[Value::integer(1), Value::integer(2)], &schema);
        let rid = info.table.insert_tuple(&tuple, &txn).unwrap();

        let index_info = catalog
            .create_index("idx_id", "t", vec![0], &txn)
            .unwrap();
        let key = tuple.key_tuple(&schema, &[0], &index_info.index.meta().key_schema);
        assert_eq!(index_info.index.scan_key(&key, &txn), vec![rid]);

        assert_eq!(catalog.table_indexes("t").len(), 1);
        assert!(catalog.table_indexes("other").is_empty());
        assert!(catalog.create_index("idx_id", "t", vec![0], &txn).is_none());
    }
}
