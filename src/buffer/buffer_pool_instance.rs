use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::lru_replacer::LruReplacer;
use super::BufferPoolManager;
use crate::common::config::{FrameId, PageId, INVALID_PAGE_ID};
use crate::storage::disk::{DiskRequest, DiskScheduler};
use crate::storage::page::Page;

/// Page table and free list of one instance, guarded together so that victim
/// selection and page installation are a single atomic step.
struct PoolState {
    /// Page table for keeping track of buffer pool pages.
    page_table: HashMap<PageId, FrameId>,
    /// List of free frames that don't have any pages on them.
    free_list: VecDeque<FrameId>,
}

/// BufferPoolInstance reads disk pages to and from its internal buffer pool.
///
/// An instance may stand alone or be one shard of a
/// [`super::ParallelBufferPoolManager`]; in the sharded case it allocates
/// page ids from the stride `{index, index + N, index + 2N, …}` so that
/// `page_id mod N` always routes back to the owning instance.
pub struct BufferPoolInstance {
    /// Number of pages in the buffer pool.
    pool_size: usize,
    /// Number of sibling instances, 1 when standing alone.
    num_instances: usize,
    /// Position of this instance among its siblings.
    instance_index: usize,
    /// The next page id to be allocated, advancing by `num_instances`.
    next_page_id: AtomicI32,

    /// Array of buffer pool pages.
    pages: Vec<Page>,
    /// Pointer to the disk scheduler, shared among sibling instances.
    disk_scheduler: Arc<DiskScheduler>,
    /// Page table and free list.
    state: Mutex<PoolState>,
    /// Replacer to find unpinned pages for replacement.
    replacer: LruReplacer,
}

impl BufferPoolInstance {
    /// Creates a stand-alone instance owning the whole page id space.
    pub fn new(pool_size: usize, disk_scheduler: Arc<DiskScheduler>) -> Self {
        Self::new_sharded(pool_size, 1, 0, disk_scheduler)
    }

    /// Creates one shard out of `num_instances`.
    pub fn new_sharded(
        pool_size: usize,
        num_instances: usize,
        instance_index: usize,
        disk_scheduler: Arc<DiskScheduler>,
    ) -> Self {
        assert!(num_instances > 0);
        assert!(
            instance_index < num_instances,
            "instance index {} out of range for {} instances",
            instance_index,
            num_instances
        );
        Self {
            pool_size,
            num_instances,
            instance_index,
            next_page_id: AtomicI32::new(instance_index as i32),
            pages: (0..pool_size).map(|_| Page::new()).collect(),
            disk_scheduler,
            state: Mutex::new(PoolState {
                page_table: HashMap::new(),
                free_list: (0..pool_size).collect(),
            }),
            replacer: LruReplacer::new(pool_size),
        }
    }

    pub fn instance_index(&self) -> usize {
        self.instance_index
    }

    /// Claims a frame for reuse, preferring the free list since frames from
    /// it never need a write-back probe. Evicted dirty pages are written
    /// back and their page table entry removed.
    fn take_victim_frame(&self, state: &mut PoolState) -> Option<FrameId> {
        if let Some(frame_id) = state.free_list.pop_front() {
            return Some(frame_id);
        }
        let frame_id = self.replacer.victim()?;
        let page = &self.pages[frame_id];
        if page.is_dirty() {
            self.write_page_to_disk(page);
        }
        let old_page_id = page.page_id();
        if old_page_id != INVALID_PAGE_ID {
            state.page_table.remove(&old_page_id);
        }
        Some(frame_id)
    }

    fn write_page_to_disk(&self, page: &Page) {
        let (tx, rx) = oneshot::channel();
        self.disk_scheduler.schedule(DiskRequest::Write {
            page: page.clone(),
            callback: tx,
        });
        rx.blocking_recv().unwrap();
        page.set_dirty(false);
    }

    fn read_page_from_disk(&self, page: &Page) {
        let (tx, rx) = oneshot::channel();
        self.disk_scheduler.schedule(DiskRequest::Read {
            page: page.clone(),
            callback: tx,
        });
        rx.blocking_recv().unwrap();
    }

    /// Draws the next unused page id from this instance's stride.
    fn allocate_page(&self) -> PageId {
        self.next_page_id
            .fetch_add(self.num_instances as i32, Ordering::SeqCst)
    }

    /// Imitates freeing the page on disk. Nothing tracks deallocated ids
    /// yet, so this only validates that the id belongs to this instance.
    fn deallocate_page(&self, page_id: PageId) {
        debug_assert_eq!(
            page_id.rem_euclid(self.num_instances as i32) as usize,
            self.instance_index,
            "page {} does not belong to instance {}",
            page_id,
            self.instance_index
        );
    }
}

impl BufferPoolManager for BufferPoolInstance {
    fn new_page(&self) -> Option<Page> {
        let mut state = self.state.lock();
        let frame_id = self.take_victim_frame(&mut state)?;

        let page_id = self.allocate_page();
        let page = &self.pages[frame_id];
        page.reset();
        page.set_page_id(page_id);
        page.pin();
        state.page_table.insert(page_id, frame_id);
        self.replacer.pin(frame_id);

        Some(page.clone())
    }

    fn fetch_page(&self, page_id: PageId) -> Option<Page> {
        let mut state = self.state.lock();
        if let Some(frame_id) = state.page_table.get(&page_id) {
            let page = &self.pages[*frame_id];
            page.pin();
            self.replacer.pin(*frame_id);
            return Some(page.clone());
        }

        let frame_id = self.take_victim_frame(&mut state)?;
        let page = &self.pages[frame_id];
        page.reset();
        page.set_page_id(page_id);
        page.pin();
        self.read_page_from_disk(page);
        state.page_table.insert(page_id, frame_id);
        self.replacer.pin(frame_id);

        Some(page.clone())
    }

    fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> bool {
        let state = self.state.lock();
        if let Some(frame_id) = state.page_table.get(&page_id) {
            let page = &self.pages[*frame_id];
            if page.pin_count() <= 0 {
                return false;
            }
            if is_dirty {
                // the dirty flag only accumulates here; flushing clears it
                page.set_dirty(true);
            }
            if page.unpin() == 0 {
                self.replacer.unpin(*frame_id);
            }
            true
        } else {
            false
        }
    }

    fn flush_page(&self, page_id: PageId) -> bool {
        if page_id == INVALID_PAGE_ID {
            return false;
        }
        let state = self.state.lock();
        if let Some(frame_id) = state.page_table.get(&page_id) {
            self.write_page_to_disk(&self.pages[*frame_id]);
            true
        } else {
            false
        }
    }

    fn flush_all_pages(&self) {
        let state = self.state.lock();
        for frame_id in state.page_table.values() {
            self.write_page_to_disk(&self.pages[*frame_id]);
        }
    }

    fn delete_page(&self, page_id: PageId) -> bool {
        let mut state = self.state.lock();
        if let Some(frame_id) = state.page_table.get(&page_id).copied() {
            let page = &self.pages[frame_id];
            if page.pin_count() > 0 {
                return false;
            }
            state.page_table.remove(&page_id);
            self.replacer.pin(frame_id);
            state.free_list.push_back(frame_id);
            page.reset();
            self.deallocate_page(page_id);
            true
        } else {
            true
        }
    }

    fn pool_size(&self) -> usize {
        self.pool_size
    }
}
