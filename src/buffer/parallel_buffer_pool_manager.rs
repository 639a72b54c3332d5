use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::buffer_pool_instance::BufferPoolInstance;
use super::BufferPoolManager;
use crate::common::config::PageId;
use crate::storage::disk::{DiskManager, DiskScheduler};
use crate::storage::page::Page;

/// A thin router over `N` independent [`BufferPoolInstance`]s.
///
/// Page-addressed calls dispatch to the instance owning `page_id mod N`.
/// The router holds no lock of its own; each instance is thread-safe, and
/// serializing across shards would defeat the point of sharding.
pub struct ParallelBufferPoolManager {
    instances: Vec<BufferPoolInstance>,
    /// Rotating start position for `new_page`, so consecutive allocations
    /// spread across instances.
    next_instance: AtomicUsize,
}

impl ParallelBufferPoolManager {
    /// Creates `num_instances` pools of `pool_size` frames each, all backed
    /// by one disk scheduler over the given disk manager.
    pub fn new(num_instances: usize, pool_size: usize, disk_manager: Arc<DiskManager>) -> Self {
        assert!(num_instances > 0);
        let disk_scheduler = Arc::new(DiskScheduler::new(disk_manager));
        Self {
            instances: (0..num_instances)
                .map(|i| {
                    BufferPoolInstance::new_sharded(
                        pool_size,
                        num_instances,
                        i,
                        disk_scheduler.clone(),
                    )
                })
                .collect(),
            next_instance: AtomicUsize::new(0),
        }
    }

    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    /// The instance responsible for the given page id.
    fn instance_for(&self, page_id: PageId) -> &BufferPoolInstance {
        let index = page_id.rem_euclid(self.instances.len() as i32) as usize;
        &self.instances[index]
    }
}

impl BufferPoolManager for ParallelBufferPoolManager {
    /// Tries instances round-robin from a rotating cursor and returns the
    /// first success; `None` only if every instance is out of frames.
    fn new_page(&self) -> Option<Page> {
        let start = self.next_instance.fetch_add(1, Ordering::SeqCst);
        for i in 0..self.instances.len() {
            let instance = &self.instances[(start + i) % self.instances.len()];
            if let Some(page) = instance.new_page() {
                return Some(page);
            }
        }
        None
    }

    fn fetch_page(&self, page_id: PageId) -> Option<Page> {
        self.instance_for(page_id).fetch_page(page_id)
    }

    fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> bool {
        self.instance_for(page_id).unpin_page(page_id, is_dirty)
    }

    fn flush_page(&self, page_id: PageId) -> bool {
        self.instance_for(page_id).flush_page(page_id)
    }

    fn flush_all_pages(&self) {
        for instance in &self.instances {
            instance.flush_all_pages();
        }
    }

    fn delete_page(&self, page_id: PageId) -> bool {
        self.instance_for(page_id).delete_page(page_id)
    }

    /// Total number of frames across all instances.
    fn pool_size(&self) -> usize {
        self.instances
            .iter()
            .map(|instance| instance.pool_size())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::common::config::INVALID_PAGE_ID;

    fn new_parallel_pool(
        dir: &TempDir,
        num_instances: usize,
        pool_size: usize,
    ) -> ParallelBufferPoolManager {
        let db_name = dir.path().join("test.db");
        let disk_manager = Arc::new(DiskManager::new(db_name.to_str().unwrap()));
        ParallelBufferPoolManager::new(num_instances, pool_size, disk_manager)
    }

    #[test]
    fn test_new_page_ids_route_back_to_owner() {
        let dir = TempDir::new("test").unwrap();
        let num_instances = 5;
        let bpm = new_parallel_pool(&dir, num_instances, 10);

        // every allocated id must route back to the instance that minted it:
        // allocation is striped, so id mod N identifies the owner
        let mut page_ids = vec![];
        for _ in 0..num_instances * 10 {
            let page = bpm.new_page().unwrap();
            page_ids.push(page.page_id());
        }
        for page_id in &page_ids {
            assert!(*page_id >= 0);
            assert_eq!(
                bpm.instance_for(*page_id).instance_index(),
                page_id.rem_euclid(num_instances as i32) as usize
            );
        }

        // the pool is exactly full now
        assert!(bpm.new_page().is_none());
        for page_id in &page_ids {
            assert!(bpm.unpin_page(*page_id, false));
        }
        assert!(bpm.new_page().is_some());
    }

    #[test]
    fn test_round_robin_spreads_allocations() {
        let dir = TempDir::new("test").unwrap();
        let num_instances = 4;
        let bpm = new_parallel_pool(&dir, num_instances, 2);

        let mut owners = vec![];
        for _ in 0..num_instances {
            let page = bpm.new_page().unwrap();
            owners.push(page.page_id().rem_euclid(num_instances as i32));
            assert!(bpm.unpin_page(page.page_id(), false));
        }
        owners.sort();
        owners.dedup();
        assert_eq!(owners.len(), num_instances);
    }

    #[test]
    fn test_operations_route_by_page_id() {
        let dir = TempDir::new("test").unwrap();
        let bpm = new_parallel_pool(&dir, 3, 4);

        let page = bpm.new_page().unwrap();
        let page_id = page.page_id();
        page.data_mut()[0..2].copy_from_slice(b"hi");
        assert!(bpm.unpin_page(page_id, true));
        assert!(bpm.flush_page(page_id));
        assert!(!bpm.flush_page(page_id + 1));

        let page = bpm.fetch_page(page_id).unwrap();
        assert_eq!(&page.data()[0..2], b"hi");
        assert!(bpm.unpin_page(page_id, false));
        assert!(bpm.delete_page(page_id));

        bpm.flush_all_pages();
        assert_eq!(bpm.pool_size(), 12);
        assert!(!bpm.unpin_page(INVALID_PAGE_ID, false));
    }
}
