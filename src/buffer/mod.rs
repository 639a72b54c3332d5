pub mod buffer_pool_instance;
pub mod lru_replacer;
pub mod parallel_buffer_pool_manager;

pub use buffer_pool_instance::BufferPoolInstance;
pub use lru_replacer::LruReplacer;
pub use parallel_buffer_pool_manager::ParallelBufferPoolManager;

use crate::common::config::PageId;
use crate::storage::page::Page;

/// The page-addressed surface shared by a single buffer pool instance and
/// the parallel router, so higher layers (table heap, hash index) do not
/// care which one backs them.
pub trait BufferPoolManager: Send + Sync {
    /// Creates a new page in the buffer pool, pinned. Returns `None` when
    /// every frame is currently in use and not evictable.
    fn new_page(&self) -> Option<Page>;

    /// Fetches the requested page, pinned. Returns `None` when the page must
    /// be read from disk but every frame is pinned.
    fn fetch_page(&self, page_id: PageId) -> Option<Page>;

    /// Unpins the target page, recording whether the caller modified it.
    /// Returns false if the page is not resident or its pin count is already
    /// zero.
    fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> bool;

    /// Flushes the target page to disk regardless of its dirty flag.
    fn flush_page(&self, page_id: PageId) -> bool;

    /// Flushes every resident page.
    fn flush_all_pages(&self);

    /// Deletes a page from the buffer pool. Returns false only if the page
    /// is resident and pinned.
    fn delete_page(&self, page_id: PageId) -> bool;

    /// Total number of frames managed.
    fn pool_size(&self) -> usize;
}
