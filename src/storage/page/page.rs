use std::sync::Arc;

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::common::config::{PageId, INVALID_PAGE_ID, PAGE_SIZE};

pub type RefPageData<'a> = MappedRwLockReadGuard<'a, [u8; PAGE_SIZE]>;
pub type MutRefPageData<'a> = MappedRwLockWriteGuard<'a, [u8; PAGE_SIZE]>;

/// One buffer pool frame: a page-sized byte block plus the bookkeeping the
/// pool keeps per frame (resident page id, pin count, dirty flag).
///
/// Cloning a `Page` clones a handle, not the frame; every clone shares the
/// same bytes and metadata behind one reader/writer latch. Byte access
/// hands out mapped guards, so whoever holds `data_mut` excludes all other
/// readers and writers of the frame, while the metadata accessors hold the
/// latch only for the duration of the call and can never deadlock against
/// a caller composing them.
#[derive(Debug, Clone)]
pub struct Page(Arc<RwLock<PageInner>>);

#[derive(Debug)]
struct PageInner {
    data: [u8; PAGE_SIZE],
    // INVALID_PAGE_ID while the frame holds no page
    page_id: PageId,
    // holders currently using the frame; evictable only at zero
    pin_count: i32,
    // set when the bytes diverge from disk, cleared by a flush
    is_dirty: bool,
}

impl Page {
    /// A fresh frame: zeroed bytes, no page, unpinned, clean.
    pub fn new() -> Page {
        Page(Arc::new(RwLock::new(PageInner {
            data: [0; PAGE_SIZE],
            page_id: INVALID_PAGE_ID,
            pin_count: 0,
            is_dirty: false,
        })))
    }

    /// Returns the frame to its freshly constructed state.
    pub fn reset(&self) {
        let mut inner = self.0.write();
        inner.data.fill(0);
        inner.page_id = INVALID_PAGE_ID;
        inner.pin_count = 0;
        inner.is_dirty = false;
    }

    /// Shared view of the page bytes.
    pub fn data(&self) -> RefPageData<'_> {
        RwLockReadGuard::map(self.0.read(), |inner| &inner.data)
    }

    /// Exclusive view of the page bytes.
    pub fn data_mut(&self) -> MutRefPageData<'_> {
        RwLockWriteGuard::map(self.0.write(), |inner| &mut inner.data)
    }

    pub fn set_page_id(&self, page_id: PageId) {
        self.0.write().page_id = page_id;
    }

    pub fn page_id(&self) -> PageId {
        self.0.read().page_id
    }

    pub fn pin_count(&self) -> i32 {
        self.0.read().pin_count
    }

    /// Increments the pin count, returning the new value.
    pub fn pin(&self) -> i32 {
        let mut inner = self.0.write();
        inner.pin_count += 1;
        inner.pin_count
    }

    /// Decrements the pin count, returning the new value so the pool can
    /// hand the frame to the replacer the moment it reaches zero. Callers
    /// check the count first; it never goes negative in correct use.
    pub fn unpin(&self) -> i32 {
        let mut inner = self.0.write();
        inner.pin_count -= 1;
        inner.pin_count
    }

    pub fn is_dirty(&self) -> bool {
        self.0.read().is_dirty
    }

    pub fn set_dirty(&self, is_dirty: bool) {
        self.0.write().is_dirty = is_dirty;
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
