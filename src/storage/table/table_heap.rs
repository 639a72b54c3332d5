use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::BufferPoolManager;
use crate::common::config::{PageId, INVALID_PAGE_ID};
use crate::common::rid::Rid;
use crate::concurrency::transaction::Transaction;
use crate::storage::page::TablePage;
use crate::storage::table::tuple::Tuple;

/// A linked chain of table pages holding the tuples of one table. All page
/// access goes through the buffer pool; every fetch is paired with an unpin
/// carrying an honest dirty flag.
pub struct TableHeap {
    buffer_pool_manager: Arc<dyn BufferPoolManager>,
    first_page_id: PageId,
    tuple_len: usize,
    // serializes appending a page to the end of the chain
    append_latch: Mutex<()>,
}

impl TableHeap {
    /// Creates a heap with one empty page. Returns `None` if the buffer
    /// pool cannot supply it.
    pub fn new(buffer_pool_manager: Arc<dyn BufferPoolManager>, tuple_len: usize) -> Option<Self> {
        let page = buffer_pool_manager.new_page()?;
        let first_page_id = page.page_id();
        TablePage::attach(page, tuple_len).init();
        buffer_pool_manager.unpin_page(first_page_id, true);
        Some(Self {
            buffer_pool_manager,
            first_page_id,
            tuple_len,
            append_latch: Mutex::new(()),
        })
    }

    pub fn first_page_id(&self) -> PageId {
        self.first_page_id
    }

    pub fn tuple_len(&self) -> usize {
        self.tuple_len
    }

    /// Inserts a tuple into the first page with room, appending a page to
    /// the chain when every existing one is full.
    pub fn insert_tuple(&self, tuple: &Tuple, _txn: &Transaction) -> Option<Rid> {
        assert_eq!(tuple.data().len(), self.tuple_len);
        let mut page_id = self.first_page_id;
        loop {
            let page = self.buffer_pool_manager.fetch_page(page_id)?;
            let view = TablePage::attach(page, self.tuple_len);
            if let Some(slot) = view.insert_tuple(tuple.data()) {
                self.buffer_pool_manager.unpin_page(page_id, true);
                return Some(Rid::new(page_id, slot));
            }
            let next_page_id = view.next_page_id();
            if next_page_id != INVALID_PAGE_ID {
                self.buffer_pool_manager.unpin_page(page_id, false);
                page_id = next_page_id;
                continue;
            }

            // end of the chain: extend it, rechecking the link under the
            // append latch since another writer may have extended it first
            let _append = self.append_latch.lock();
            let next_page_id = view.next_page_id();
            if next_page_id != INVALID_PAGE_ID {
                self.buffer_pool_manager.unpin_page(page_id, false);
                page_id = next_page_id;
                continue;
            }
            let new_page = match self.buffer_pool_manager.new_page() {
                Some(p) => p,
                None => {
                    self.buffer_pool_manager.unpin_page(page_id, false);
                    return None;
                }
            };
            let new_page_id = new_page.page_id();
            TablePage::attach(new_page, self.tuple_len).init();
            view.set_next_page_id(new_page_id);
            self.buffer_pool_manager.unpin_page(page_id, true);
            self.buffer_pool_manager.unpin_page(new_page_id, true);
            page_id = new_page_id;
        }
    }

    /// Removes the tuple at `rid`. Returns false if no live tuple is there.
    pub fn apply_delete(&self, rid: Rid, _txn: &Transaction) -> bool {
        let Some(page) = self.buffer_pool_manager.fetch_page(rid.page_id) else {
            return false;
        };
        let view = TablePage::attach(page, self.tuple_len);
        let deleted = view.delete_tuple(rid.slot_num);
        self.buffer_pool_manager.unpin_page(rid.page_id, deleted);
        deleted
    }

    /// Overwrites the tuple at `rid` in place.
    pub fn update_tuple(&self, tuple: &Tuple, rid: Rid, _txn: &Transaction) -> bool {
        assert_eq!(tuple.data().len(), self.tuple_len);
        let Some(page) = self.buffer_pool_manager.fetch_page(rid.page_id) else {
            return false;
        };
        let view = TablePage::attach(page, self.tuple_len);
        let updated = view.update_tuple(rid.slot_num, tuple.data());
        self.buffer_pool_manager.unpin_page(rid.page_id, updated);
        updated
    }

    pub fn get_tuple(&self, rid: Rid, _txn: &Transaction) -> Option<Tuple> {
        let page = self.buffer_pool_manager.fetch_page(rid.page_id)?;
        let view = TablePage::attach(page, self.tuple_len);
        let data = view.tuple_at(rid.slot_num);
        self.buffer_pool_manager.unpin_page(rid.page_id, false);
        let mut tuple = Tuple::new(data?);
        tuple.set_rid(rid);
        Some(tuple)
    }

    /// A scanning iterator positioned before the first tuple. The iterator
    /// pins one page at a time, only for the duration of a step.
    pub fn iter(&self) -> TableIterator {
        TableIterator {
            buffer_pool_manager: self.buffer_pool_manager.clone(),
            tuple_len: self.tuple_len,
            page_id: self.first_page_id,
            slot: 0,
        }
    }
}

/// Walks every live tuple of a table heap in (page, slot) order.
pub struct TableIterator {
    buffer_pool_manager: Arc<dyn BufferPoolManager>,
    tuple_len: usize,
    page_id: PageId,
    slot: u32,
}

impl Iterator for TableIterator {
    type Item = (Rid, Tuple);

    fn next(&mut self) -> Option<Self::Item> {
        while self.page_id != INVALID_PAGE_ID {
            let page = self.buffer_pool_manager.fetch_page(self.page_id)?;
            let view = TablePage::attach(page, self.tuple_len);
            if let Some(slot) = view.first_live_slot_from(self.slot) {
                let rid = Rid::new(self.page_id, slot);
                let mut tuple = Tuple::new(view.tuple_at(slot).unwrap());
                tuple.set_rid(rid);
                self.buffer_pool_manager.unpin_page(self.page_id, false);
                self.slot = slot + 1;
                return Some((rid, tuple));
            }
            let next_page_id = view.next_page_id();
            self.buffer_pool_manager.unpin_page(self.page_id, false);
            self.page_id = next_page_id;
            self.slot = 0;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::buffer::BufferPoolInstance;
    use crate::concurrency::transaction::Transaction;
    use crate::storage::disk::{DiskManager, DiskScheduler};

    fn new_heap(dir: &TempDir, pool_size: usize, tuple_len: usize) -> TableHeap {
        let db_name = dir.path().join("test.db");
        let disk_manager = Arc::new(DiskManager::new(db_name.to_str().unwrap()));
        let scheduler = Arc::new(DiskScheduler::new(disk_manager));
        let bpm: Arc<dyn BufferPoolManager> =
            Arc::new(BufferPoolInstance::new(pool_size, scheduler));
        TableHeap::new(bpm, tuple_len).unwrap()
    }

    fn tuple_of(byte: u8, len: usize) -> Tuple {
        Tuple::new(vec![byte; len])
    }

    #[test]
    fn test_heap_insert_get_delete() {
        let dir = TempDir::new("test").unwrap();
        let heap = new_heap(&dir, 10, 16);
        let txn = Transaction::new(0);

        let rid = heap.insert_tuple(&tuple_of(1, 16), &txn).unwrap();
        assert_eq!(heap.get_tuple(rid, &txn).unwrap().data(), &[1u8; 16]);

        assert!(heap.update_tuple(&tuple_of(2, 16), rid, &txn));
        assert_eq!(heap.get_tuple(rid, &txn).unwrap().data(), &[2u8; 16]);

        assert!(heap.apply_delete(rid, &txn));
        assert!(!heap.apply_delete(rid, &txn));
        assert!(heap.get_tuple(rid, &txn).is_none());
    }

    #[test]
    fn test_heap_spans_pages_and_scans() {
        let dir = TempDir::new("test").unwrap();
        // big tuples so the chain needs several pages
        let tuple_len = 1024;
        let heap = new_heap(&dir, 10, tuple_len);
        let txn = Transaction::new(0);

        let total = 10;
        for i in 0..total {
            heap.insert_tuple(&tuple_of(i as u8, tuple_len), &txn)
                .unwrap();
        }

        let scanned: Vec<(Rid, Tuple)> = heap.iter().collect();
        assert_eq!(scanned.len(), total);
        let pages: std::collections::HashSet<PageId> =
            scanned.iter().map(|(rid, _)| rid.page_id).collect();
        assert!(pages.len() > 1);
        for (rid, tuple) in &scanned {
            assert_eq!(heap.get_tuple(*rid, &txn).unwrap().data(), tuple.data());
            assert_eq!(tuple.rid(), *rid);
        }
    }

    #[test]
    fn test_scan_skips_deleted_tuples() {
        let dir = TempDir::new("test").unwrap();
        let heap = new_heap(&dir, 10, 8);
        let txn = Transaction::new(0);

        let mut rids = vec![];
        for i in 0..6u8 {
            rids.push(heap.insert_tuple(&tuple_of(i, 8), &txn).unwrap());
        }
        for rid in rids.iter().step_by(2) {
            assert!(heap.apply_delete(*rid, &txn));
        }

        let survivors: Vec<u8> = heap.iter().map(|(_, t)| t.data()[0]).collect();
        assert_eq!(survivors, vec![1, 3, 5]);
    }
}
