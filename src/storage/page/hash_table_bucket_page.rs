use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::common::codec::PageCodec;
use crate::common::config::PAGE_SIZE;
use crate::storage::index::KeyComparator;
use crate::storage::page::Page;

/// Typed view over one bucket page of an extendible hash table.
///
/// Layout: two bitmaps followed by a fixed-capacity array of encoded
/// `(key, value)` entries. The `occupied` bitmap records whether a slot was
/// ever used; the `readable` bitmap records whether it currently holds a
/// live entry, so `readable` is always a subset of `occupied`. Capacity is
/// derived from the encoded entry size so bitmaps and array together fit in
/// one page.
pub struct HashTableBucketPage<K, V> {
    page: Page,
    _marker: PhantomData<(K, V)>,
}

impl<K, V> HashTableBucketPage<K, V>
where
    K: PageCodec,
    V: PageCodec + PartialEq,
{
    pub fn attach(page: Page) -> Self {
        debug_assert!(
            Self::array_offset() + Self::capacity() * Self::entry_size() <= PAGE_SIZE
        );
        Self {
            page,
            _marker: PhantomData,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    fn entry_size() -> usize {
        K::ENCODED_SIZE + V::ENCODED_SIZE
    }

    /// Number of entries a bucket can hold: each slot costs its encoded size
    /// plus two bitmap bits.
    pub fn capacity() -> usize {
        4 * PAGE_SIZE / (4 * Self::entry_size() + 1)
    }

    fn bitmap_size() -> usize {
        (Self::capacity() + 7) / 8
    }

    fn readable_offset() -> usize {
        Self::bitmap_size()
    }

    fn array_offset() -> usize {
        2 * Self::bitmap_size()
    }

    fn entry_offset(slot: usize) -> usize {
        Self::array_offset() + slot * Self::entry_size()
    }

    fn bit(data: &[u8], base: usize, slot: usize) -> bool {
        data[base + slot / 8] & (1 << (slot % 8)) != 0
    }

    fn set_bit(data: &mut [u8], base: usize, slot: usize, on: bool) {
        if on {
            data[base + slot / 8] |= 1 << (slot % 8);
        } else {
            data[base + slot / 8] &= !(1 << (slot % 8));
        }
    }

    fn decode_entry(data: &[u8], slot: usize) -> (K, V) {
        let offset = Self::entry_offset(slot);
        let key = K::decode(&data[offset..offset + K::ENCODED_SIZE]);
        let value = V::decode(
            &data[offset + K::ENCODED_SIZE..offset + K::ENCODED_SIZE + V::ENCODED_SIZE],
        );
        (key, value)
    }

    /// Appends the values stored under keys equal to `key`. Returns whether
    /// anything matched.
    pub fn get_value<C: KeyComparator<K>>(&self, key: &K, cmp: &C, result: &mut Vec<V>) -> bool {
        let data = self.page.data();
        let mut found = false;
        for slot in 0..Self::capacity() {
            if !Self::bit(&*data, 0, slot) {
                // never-used slots terminate the scan
                break;
            }
            if !Self::bit(&*data, Self::readable_offset(), slot) {
                continue;
            }
            let (stored_key, stored_value) = Self::decode_entry(&*data, slot);
            if cmp.compare(&stored_key, key) == Ordering::Equal {
                result.push(stored_value);
                found = true;
            }
        }
        found
    }

    /// Returns whether an identical `(key, value)` entry is live.
    pub fn contains<C: KeyComparator<K>>(&self, key: &K, value: &V, cmp: &C) -> bool {
        let data = self.page.data();
        for slot in 0..Self::capacity() {
            if !Self::bit(&*data, 0, slot) {
                break;
            }
            if !Self::bit(&*data, Self::readable_offset(), slot) {
                continue;
            }
            let (stored_key, stored_value) = Self::decode_entry(&*data, slot);
            if cmp.compare(&stored_key, key) == Ordering::Equal && stored_value == *value {
                return true;
            }
        }
        false
    }

    /// Inserts into the first free slot, reusing tombstones. Returns false
    /// when an identical entry exists or the bucket is full.
    pub fn insert<C: KeyComparator<K>>(&self, key: &K, value: &V, cmp: &C) -> bool {
        let mut data = self.page.data_mut();
        let mut free_slot = None;
        for slot in 0..Self::capacity() {
            if !Self::bit(&*data, Self::readable_offset(), slot) {
                if free_slot.is_none() {
                    free_slot = Some(slot);
                }
                if !Self::bit(&*data, 0, slot) {
                    break;
                }
                continue;
            }
            let (stored_key, stored_value) = Self::decode_entry(&*data, slot);
            if cmp.compare(&stored_key, key) == Ordering::Equal && stored_value == *value {
                return false;
            }
        }
        let Some(slot) = free_slot else {
            return false;
        };
        let offset = Self::entry_offset(slot);
        key.encode(&mut data[offset..offset + K::ENCODED_SIZE]);
        value.encode(
            &mut data[offset + K::ENCODED_SIZE..offset + K::ENCODED_SIZE + V::ENCODED_SIZE],
        );
        Self::set_bit(&mut *data, 0, slot, true);
        Self::set_bit(&mut *data, Self::readable_offset(), slot, true);
        true
    }

    /// Clears the readable bit of every entry equal to `(key, value)`.
    /// Returns whether anything was removed.
    pub fn remove<C: KeyComparator<K>>(&self, key: &K, value: &V, cmp: &C) -> bool {
        let mut data = self.page.data_mut();
        let mut removed = false;
        for slot in 0..Self::capacity() {
            if !Self::bit(&*data, 0, slot) {
                break;
            }
            if !Self::bit(&*data, Self::readable_offset(), slot) {
                continue;
            }
            let (stored_key, stored_value) = Self::decode_entry(&*data, slot);
            if cmp.compare(&stored_key, key) == Ordering::Equal && stored_value == *value {
                Self::set_bit(&mut *data, Self::readable_offset(), slot, false);
                removed = true;
            }
        }
        removed
    }

    pub fn remove_at(&self, slot: usize) {
        assert!(slot < Self::capacity());
        let mut data = self.page.data_mut();
        Self::set_bit(&mut *data, Self::readable_offset(), slot, false);
    }

    pub fn key_at(&self, slot: usize) -> K {
        assert!(slot < Self::capacity());
        let data = self.page.data();
        Self::decode_entry(&*data, slot).0
    }

    pub fn value_at(&self, slot: usize) -> V {
        assert!(slot < Self::capacity());
        let data = self.page.data();
        Self::decode_entry(&*data, slot).1
    }

    pub fn is_occupied(&self, slot: usize) -> bool {
        assert!(slot < Self::capacity());
        Self::bit(&*self.page.data(), 0, slot)
    }

    pub fn is_readable(&self, slot: usize) -> bool {
        assert!(slot < Self::capacity());
        Self::bit(&*self.page.data(), Self::readable_offset(), slot)
    }

    /// Snapshot of every live `(slot, key, value)` entry, taken under one
    /// latch acquisition.
    pub fn readable_entries(&self) -> Vec<(usize, K, V)> {
        let data = self.page.data();
        let mut entries = Vec::new();
        for slot in 0..Self::capacity() {
            if !Self::bit(&*data, 0, slot) {
                break;
            }
            if Self::bit(&*data, Self::readable_offset(), slot) {
                let (key, value) = Self::decode_entry(&*data, slot);
                entries.push((slot, key, value));
            }
        }
        entries
    }

    pub fn num_readable(&self) -> usize {
        let data = self.page.data();
        let mut count = 0;
        for slot in 0..Self::capacity() {
            if !Self::bit(&*data, 0, slot) {
                break;
            }
            if Self::bit(&*data, Self::readable_offset(), slot) {
                count += 1;
            }
        }
        count
    }

    pub fn is_full(&self) -> bool {
        self.num_readable() == Self::capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.num_readable() == 0
    }
}
