use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::buffer::BufferPoolManager;
use crate::common::codec::PageCodec;
use crate::common::config::{PageId, DIRECTORY_MAX_DEPTH};
use crate::common::hash_util::hash_key;
use crate::storage::index::KeyComparator;
use crate::storage::page::{HashTableBucketPage, HashTableDirectoryPage};

/// A disk-backed extendible hash table, parameterised by key, value and
/// comparator types.
///
/// The directory and every bucket live on ordinary buffer pool pages. A
/// bucket that fills up is split, doubling the directory when its local
/// depth has caught up with the global depth; a bucket that empties is
/// merged back into its split image. One table-level reader/writer latch
/// serializes writers against everything else; readers proceed in parallel.
/// The latch covers logical ordering only, so every page access still pins
/// through the buffer pool and unpins when done.
pub struct ExtendibleHashTable<K, V, C> {
    directory_page_id: PageId,
    buffer_pool_manager: Arc<dyn BufferPoolManager>,
    comparator: C,
    table_latch: RwLock<()>,
    _marker: PhantomData<(K, V)>,
}

impl<K, V, C> ExtendibleHashTable<K, V, C>
where
    K: PageCodec + Hash + Clone + Send + Sync,
    V: PageCodec + PartialEq + Clone + Send + Sync,
    C: KeyComparator<K>,
{
    /// Creates a table with a depth-zero directory pointing at one empty
    /// bucket. Returns `None` if the buffer pool cannot supply the two
    /// pages.
    pub fn new(buffer_pool_manager: Arc<dyn BufferPoolManager>, comparator: C) -> Option<Self> {
        let directory_page = buffer_pool_manager.new_page()?;
        let directory_page_id = directory_page.page_id();
        let directory = HashTableDirectoryPage::attach(directory_page);
        directory.init();

        let bucket_page = match buffer_pool_manager.new_page() {
            Some(page) => page,
            None => {
                buffer_pool_manager.unpin_page(directory_page_id, true);
                return None;
            }
        };
        directory.set_bucket_page_id(0, bucket_page.page_id());
        directory.set_local_depth(0, 0);

        buffer_pool_manager.unpin_page(bucket_page.page_id(), false);
        buffer_pool_manager.unpin_page(directory_page_id, true);

        Some(Self {
            directory_page_id,
            buffer_pool_manager,
            comparator,
            table_latch: RwLock::new(()),
            _marker: PhantomData,
        })
    }

    pub fn directory_page_id(&self) -> PageId {
        self.directory_page_id
    }

    fn hash(key: &K) -> u32 {
        hash_key(key)
    }

    fn fetch_directory(&self) -> Option<HashTableDirectoryPage> {
        self.buffer_pool_manager
            .fetch_page(self.directory_page_id)
            .map(HashTableDirectoryPage::attach)
    }

    fn fetch_bucket(&self, bucket_page_id: PageId) -> Option<HashTableBucketPage<K, V>> {
        self.buffer_pool_manager
            .fetch_page(bucket_page_id)
            .map(HashTableBucketPage::attach)
    }

    fn unpin(&self, page_id: PageId, is_dirty: bool) {
        self.buffer_pool_manager.unpin_page(page_id, is_dirty);
    }

    /// Appends every value stored under `key` to `result`. Returns whether
    /// anything matched.
    pub fn get_value(&self, key: &K, result: &mut Vec<V>) -> bool {
        let _guard = self.table_latch.read();

        let Some(directory) = self.fetch_directory() else {
            return false;
        };
        let slot = (Self::hash(key) & directory.global_depth_mask()) as usize;
        let bucket_page_id = directory.bucket_page_id(slot);
        self.unpin(self.directory_page_id, false);

        let Some(bucket) = self.fetch_bucket(bucket_page_id) else {
            return false;
        };
        let found = bucket.get_value(key, &self.comparator, result);
        self.unpin(bucket_page_id, false);
        found
    }

    /// Inserts `(key, value)` unless an identical pair already exists.
    /// A full target bucket is split, repeatedly if every resident entry
    /// rehashes onto the same side.
    pub fn insert(&self, key: &K, value: &V) -> bool {
        let _guard = self.table_latch.write();

        loop {
            let Some(directory) = self.fetch_directory() else {
                return false;
            };
            let slot = (Self::hash(key) & directory.global_depth_mask()) as usize;
            let bucket_page_id = directory.bucket_page_id(slot);
            let Some(bucket) = self.fetch_bucket(bucket_page_id) else {
                self.unpin(self.directory_page_id, false);
                return false;
            };

            if bucket.contains(key, value, &self.comparator) {
                self.unpin(bucket_page_id, false);
                self.unpin(self.directory_page_id, false);
                return false;
            }
            if !bucket.is_full() {
                let inserted = bucket.insert(key, value, &self.comparator);
                self.unpin(bucket_page_id, inserted);
                self.unpin(self.directory_page_id, false);
                return inserted;
            }

            // full: split the bucket, then retry through the fresh mapping
            if !self.split_bucket(&directory, slot, &bucket) {
                self.unpin(bucket_page_id, false);
                self.unpin(self.directory_page_id, false);
                return false;
            }
            self.unpin(bucket_page_id, true);
            self.unpin(self.directory_page_id, true);
        }
    }

    /// Splits the full bucket at `slot`. Doubles the directory first when
    /// the bucket's local depth equals the global depth, then moves every
    /// entry whose hash has the new depth bit set into a fresh bucket page.
    /// Returns false when no page could be allocated for the new bucket.
    fn split_bucket(
        &self,
        directory: &HashTableDirectoryPage,
        slot: usize,
        bucket: &HashTableBucketPage<K, V>,
    ) -> bool {
        let bucket_page_id = directory.bucket_page_id(slot);
        let local_depth = directory.local_depth(slot);
        if local_depth == directory.global_depth() {
            // A split at max depth cannot free any room: that is either a
            // pathological hash or a broken directory.
            assert!(
                directory.global_depth() < DIRECTORY_MAX_DEPTH,
                "cannot split bucket page {} beyond max depth",
                bucket_page_id
            );
            directory.incr_global_depth();
        }

        let Some(new_page) = self.buffer_pool_manager.new_page() else {
            return false;
        };
        let new_page_id = new_page.page_id();
        let new_bucket: HashTableBucketPage<K, V> = HashTableBucketPage::attach(new_page);

        // Slots referencing the old bucket are exactly those sharing its low
        // `local_depth` bits; the ones with the next bit set move over.
        let split_bit = 1u32 << local_depth;
        for s in 0..directory.size() {
            if directory.bucket_page_id(s) != bucket_page_id {
                continue;
            }
            if s as u32 & split_bit != 0 {
                directory.set_bucket_page_id(s, new_page_id);
            }
            directory.set_local_depth(s, (local_depth + 1) as u8);
        }

        let mut moved = 0;
        for (entry_slot, entry_key, entry_value) in bucket.readable_entries() {
            if Self::hash(&entry_key) & split_bit != 0 {
                new_bucket.insert(&entry_key, &entry_value, &self.comparator);
                bucket.remove_at(entry_slot);
                moved += 1;
            }
        }
        debug!(
            bucket_page_id,
            new_page_id,
            moved,
            global_depth = directory.global_depth(),
            "split bucket"
        );

        self.unpin(new_page_id, true);
        true
    }

    /// Removes `(key, value)`. A bucket left empty is merged back into its
    /// split image when depths allow.
    pub fn remove(&self, key: &K, value: &V) -> bool {
        let _guard = self.table_latch.write();

        let Some(directory) = self.fetch_directory() else {
            return false;
        };
        let slot = (Self::hash(key) & directory.global_depth_mask()) as usize;
        let bucket_page_id = directory.bucket_page_id(slot);
        let Some(bucket) = self.fetch_bucket(bucket_page_id) else {
            self.unpin(self.directory_page_id, false);
            return false;
        };

        let removed = bucket.remove(key, value, &self.comparator);
        let emptied = removed && bucket.is_empty();
        self.unpin(bucket_page_id, removed);

        let mut merged = false;
        if emptied {
            merged = self.merge_bucket(&directory, slot);
        }
        self.unpin(self.directory_page_id, merged);
        removed
    }

    /// Folds the empty bucket at `slot` into its split image: every
    /// directory slot referencing either bucket ends up pointing at the
    /// image with a decremented local depth, and the empty page is deleted.
    /// Skipped when the bucket saw a re-insert, sits at depth zero, or its
    /// image is at a different depth. The directory never shrinks here.
    fn merge_bucket(&self, directory: &HashTableDirectoryPage, slot: usize) -> bool {
        let local_depth = directory.local_depth(slot);
        if local_depth == 0 {
            return false;
        }
        let image_slot = directory.split_image_index(slot);
        if directory.local_depth(image_slot) != local_depth {
            return false;
        }
        let bucket_page_id = directory.bucket_page_id(slot);
        let image_page_id = directory.bucket_page_id(image_slot);

        // the bucket may have been refilled since the caller observed it
        let Some(bucket) = self.fetch_bucket(bucket_page_id) else {
            return false;
        };
        let still_empty = bucket.is_empty();
        self.unpin(bucket_page_id, false);
        if !still_empty {
            return false;
        }

        for s in 0..directory.size() {
            let page_id = directory.bucket_page_id(s);
            if page_id == bucket_page_id {
                directory.set_bucket_page_id(s, image_page_id);
                directory.set_local_depth(s, (local_depth - 1) as u8);
            } else if page_id == image_page_id {
                directory.set_local_depth(s, (local_depth - 1) as u8);
            }
        }
        self.buffer_pool_manager.delete_page(bucket_page_id);
        debug!(
            bucket_page_id,
            image_page_id,
            local_depth = local_depth - 1,
            "merged bucket into split image"
        );
        true
    }

    /// Current global depth; exposed for tests and integrity checks.
    pub fn global_depth(&self) -> u32 {
        let _guard = self.table_latch.read();
        let Some(directory) = self.fetch_directory() else {
            return 0;
        };
        let global_depth = directory.global_depth();
        self.unpin(self.directory_page_id, false);
        global_depth
    }

    /// Panics if the directory invariants do not hold.
    pub fn verify_integrity(&self) {
        let _guard = self.table_latch.read();
        let Some(directory) = self.fetch_directory() else {
            return;
        };
        directory.verify_integrity();
        self.unpin(self.directory_page_id, false);
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::buffer::{BufferPoolInstance, ParallelBufferPoolManager};
    use crate::storage::disk::{DiskManager, DiskScheduler};
    use crate::storage::index::IntComparator;

    type IntTable = ExtendibleHashTable<i32, i32, IntComparator>;

    fn new_table(dir: &TempDir, pool_size: usize) -> IntTable {
        let db_name = dir.path().join("test.db");
        let disk_manager = Arc::new(DiskManager::new(db_name.to_str().unwrap()));
        let scheduler = Arc::new(DiskScheduler::new(disk_manager));
        let bpm: Arc<dyn BufferPoolManager> =
            Arc::new(BufferPoolInstance::new(pool_size, scheduler));
        ExtendibleHashTable::new(bpm, IntComparator).unwrap()
    }

    #[test]
    fn test_hash_table_insert_and_get() {
        let dir = TempDir::new("test").unwrap();
        let table = new_table(&dir, 10);

        for k in 0..100 {
            assert!(table.insert(&k, &k));
        }
        for k in 0..100 {
            let mut result = vec![];
            assert!(table.get_value(&k, &mut result));
            assert_eq!(result, vec![k]);
        }
        let mut result = vec![];
        assert!(!table.get_value(&100, &mut result));
        assert!(result.is_empty());

        // duplicate (key, value) pairs are rejected, distinct values under
        // the same key are kept
        assert!(!table.insert(&5, &5));
        assert!(table.insert(&5, &500));
        let mut result = vec![];
        assert!(table.get_value(&5, &mut result));
        result.sort();
        assert_eq!(result, vec![5, 500]);

        table.verify_integrity();
    }

    #[test]
    fn test_hash_table_grows_and_shrinks() {
        let dir = TempDir::new("test").unwrap();
        let table = new_table(&dir, 20);

        let keys = 4 * HashTableBucketPage::<i32, i32>::capacity() as i32;
        for k in 0..keys {
            assert!(table.insert(&k, &k));
        }
        assert!(table.global_depth() >= 2);
        table.verify_integrity();

        for k in 0..keys {
            let mut result = vec![];
            assert!(table.get_value(&k, &mut result), "key {} lost", k);
            assert_eq!(result, vec![k]);
        }

        for k in 0..keys {
            assert!(table.remove(&k, &k));
            assert!(!table.remove(&k, &k));
        }
        for k in 0..keys {
            let mut result = vec![];
            assert!(!table.get_value(&k, &mut result));
        }
        table.verify_integrity();
    }

    #[test]
    fn test_hash_table_does_not_leak_pins() {
        let dir = TempDir::new("test").unwrap();
        // a pool this small only survives a long workload if every fetch is
        // matched by an unpin
        let table = new_table(&dir, 8);

        let keys = 3 * HashTableBucketPage::<i32, i32>::capacity() as i32;
        for round in 0..3 {
            for k in 0..keys {
                assert!(table.insert(&k, &(k + round)), "insert failed on round {}", round);
            }
            for k in 0..keys {
                assert!(table.remove(&k, &(k + round)));
            }
        }
        table.verify_integrity();
    }

    #[test]
    fn test_hash_table_on_parallel_pool() {
        let dir = TempDir::new("test").unwrap();
        let db_name = dir.path().join("test.db");
        let disk_manager = Arc::new(DiskManager::new(db_name.to_str().unwrap()));
        let bpm: Arc<dyn BufferPoolManager> =
            Arc::new(ParallelBufferPoolManager::new(3, 10, disk_manager));
        let table: IntTable = ExtendibleHashTable::new(bpm, IntComparator).unwrap();

        let keys = 2 * HashTableBucketPage::<i32, i32>::capacity() as i32;
        for k in 0..keys {
            assert!(table.insert(&k, &k));
        }
        for k in 0..keys {
            let mut result = vec![];
            assert!(table.get_value(&k, &mut result));
            assert_eq!(result, vec![k]);
        }
        table.verify_integrity();
    }

    #[test]
    fn test_hash_table_concurrent_readers() {
        let dir = TempDir::new("test").unwrap();
        let table = new_table(&dir, 20);

        for k in 0..256 {
            assert!(table.insert(&k, &k));
        }

        crossbeam::thread::scope(|s| {
            for t in 0..4 {
                let table = &table;
                s.spawn(move |_| {
                    for k in (t..256).step_by(4) {
                        let mut result = vec![];
                        assert!(table.get_value(&k, &mut result));
                        assert_eq!(result, vec![k]);
                    }
                });
            }
        })
        .unwrap();
    }
}
