use std::collections::HashMap;

use crate::common::config::{
    PageId, DIRECTORY_ARRAY_SIZE, DIRECTORY_MAX_DEPTH, INVALID_PAGE_ID,
};
use crate::storage::page::Page;

const OFFSET_GLOBAL_DEPTH: usize = 0;
const OFFSET_BUCKET_PAGE_IDS: usize = 4;
const OFFSET_LOCAL_DEPTHS: usize = OFFSET_BUCKET_PAGE_IDS + 4 * DIRECTORY_ARRAY_SIZE;

/// Typed view over the directory page of an extendible hash table.
///
/// Layout: a 4-byte global depth, followed by `DIRECTORY_ARRAY_SIZE` bucket
/// page ids (4 bytes each) and `DIRECTORY_ARRAY_SIZE` local depths (1 byte
/// each). Every accessor bounds-checks its slot index, so a corrupted
/// directory fails loudly instead of reinterpreting stray bytes.
pub struct HashTableDirectoryPage {
    page: Page,
}

impl HashTableDirectoryPage {
    pub fn attach(page: Page) -> Self {
        Self { page }
    }

    /// Prepares a freshly allocated page: depth zero, every slot unset.
    pub fn init(&self) {
        let mut data = self.page.data_mut();
        data[OFFSET_GLOBAL_DEPTH..OFFSET_GLOBAL_DEPTH + 4].copy_from_slice(&0u32.to_le_bytes());
        for slot in 0..DIRECTORY_ARRAY_SIZE {
            let offset = OFFSET_BUCKET_PAGE_IDS + 4 * slot;
            data[offset..offset + 4].copy_from_slice(&INVALID_PAGE_ID.to_le_bytes());
            data[OFFSET_LOCAL_DEPTHS + slot] = 0;
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page.page_id()
    }

    pub fn global_depth(&self) -> u32 {
        let data = self.page.data();
        u32::from_le_bytes(
            data[OFFSET_GLOBAL_DEPTH..OFFSET_GLOBAL_DEPTH + 4]
                .try_into()
                .unwrap(),
        )
    }

    pub fn global_depth_mask(&self) -> u32 {
        (1 << self.global_depth()) - 1
    }

    /// Number of directory slots currently addressable.
    pub fn size(&self) -> usize {
        1 << self.global_depth()
    }

    /// Doubles the directory. Every new slot inherits the bucket page id and
    /// local depth of the slot that shares its low `global_depth` bits.
    pub fn incr_global_depth(&self) {
        let mut data = self.page.data_mut();
        let global_depth = u32::from_le_bytes(
            data[OFFSET_GLOBAL_DEPTH..OFFSET_GLOBAL_DEPTH + 4]
                .try_into()
                .unwrap(),
        );
        assert!(
            global_depth < DIRECTORY_MAX_DEPTH,
            "extendible hash directory exceeded max depth {}",
            DIRECTORY_MAX_DEPTH
        );
        let old_size = 1usize << global_depth;
        for slot in 0..old_size {
            let src = OFFSET_BUCKET_PAGE_IDS + 4 * slot;
            let dst = OFFSET_BUCKET_PAGE_IDS + 4 * (slot + old_size);
            let page_id: [u8; 4] = data[src..src + 4].try_into().unwrap();
            data[dst..dst + 4].copy_from_slice(&page_id);
            data[OFFSET_LOCAL_DEPTHS + slot + old_size] = data[OFFSET_LOCAL_DEPTHS + slot];
        }
        data[OFFSET_GLOBAL_DEPTH..OFFSET_GLOBAL_DEPTH + 4]
            .copy_from_slice(&(global_depth + 1).to_le_bytes());
    }

    pub fn bucket_page_id(&self, slot: usize) -> PageId {
        assert!(slot < DIRECTORY_ARRAY_SIZE);
        let data = self.page.data();
        let offset = OFFSET_BUCKET_PAGE_IDS + 4 * slot;
        PageId::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    pub fn set_bucket_page_id(&self, slot: usize, bucket_page_id: PageId) {
        assert!(slot < DIRECTORY_ARRAY_SIZE);
        let mut data = self.page.data_mut();
        let offset = OFFSET_BUCKET_PAGE_IDS + 4 * slot;
        data[offset..offset + 4].copy_from_slice(&bucket_page_id.to_le_bytes());
    }

    pub fn local_depth(&self, slot: usize) -> u32 {
        assert!(slot < DIRECTORY_ARRAY_SIZE);
        let data = self.page.data();
        data[OFFSET_LOCAL_DEPTHS + slot] as u32
    }

    pub fn set_local_depth(&self, slot: usize, local_depth: u8) {
        assert!(slot < DIRECTORY_ARRAY_SIZE);
        assert!((local_depth as u32) <= DIRECTORY_MAX_DEPTH);
        let mut data = self.page.data_mut();
        data[OFFSET_LOCAL_DEPTHS + slot] = local_depth;
    }

    /// The slot that differs from `slot` only in the bit at position
    /// `local_depth - 1`; the other half of a bucket's slot set after a
    /// split.
    pub fn split_image_index(&self, slot: usize) -> usize {
        let local_depth = self.local_depth(slot);
        assert!(local_depth > 0, "slot {} has no split image", slot);
        slot ^ (1 << (local_depth - 1))
    }

    /// Checks the directory invariants, panicking on violation:
    /// `local_depth[s] <= global_depth` for every slot, every bucket page id
    /// is referenced by exactly `2^(global_depth - local_depth)` slots, and
    /// slots sharing the low `local_depth` bits share the bucket page id.
    pub fn verify_integrity(&self) {
        let global_depth = self.global_depth();
        let mut reference_counts: HashMap<PageId, u32> = HashMap::new();
        for slot in 0..self.size() {
            let local_depth = self.local_depth(slot);
            assert!(
                local_depth <= global_depth,
                "slot {} local depth {} exceeds global depth {}",
                slot,
                local_depth,
                global_depth
            );
            let bucket_page_id = self.bucket_page_id(slot);
            assert_ne!(bucket_page_id, INVALID_PAGE_ID, "slot {} unset", slot);
            *reference_counts.entry(bucket_page_id).or_insert(0) += 1;

            let low_bits = slot & ((1 << local_depth) - 1);
            assert_eq!(
                bucket_page_id,
                self.bucket_page_id(low_bits),
                "slot {} disagrees with canonical slot {}",
                slot,
                low_bits
            );
            assert_eq!(local_depth, self.local_depth(low_bits));
        }
        for slot in 0..self.size() {
            let expected = 1u32 << (global_depth - self.local_depth(slot));
            let count = reference_counts[&self.bucket_page_id(slot)];
            assert_eq!(
                count,
                expected,
                "bucket page {} referenced by {} slots, expected {}",
                self.bucket_page_id(slot),
                count,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_init_and_growth() {
        let page = Page::new();
        page.set_page_id(0);
        let directory = HashTableDirectoryPage::attach(page);
        directory.init();

        assert_eq!(directory.global_depth(), 0);
        assert_eq!(directory.size(), 1);
        assert_eq!(directory.global_depth_mask(), 0);

        directory.set_bucket_page_id(0, 3);
        directory.set_local_depth(0, 0);
        directory.verify_integrity();

        directory.incr_global_depth();
        assert_eq!(directory.global_depth(), 1);
        assert_eq!(directory.size(), 2);
        // the new slot inherits the image of its low-bit twin
        assert_eq!(directory.bucket_page_id(1), 3);
        assert_eq!(directory.local_depth(1), 0);
        directory.verify_integrity();

        // split slot 1 off onto its own bucket
        directory.set_bucket_page_id(1, 4);
        directory.set_local_depth(0, 1);
        directory.set_local_depth(1, 1);
        directory.verify_integrity();
        assert_eq!(directory.split_image_index(1), 0);
    }

    #[test]
    #[should_panic]
    fn test_directory_max_depth_is_enforced() {
        let directory = HashTableDirectoryPage::attach(Page::new());
        directory.init();
        for _ in 0..=DIRECTORY_MAX_DEPTH {
            directory.incr_global_depth();
        }
    }
}
