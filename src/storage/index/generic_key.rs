use std::cmp::Ordering;

use crate::common::codec::PageCodec;
use crate::storage::index::KeyComparator;
use crate::storage::table::tuple::Tuple;

/// A fixed-size index key holding the serialized key columns of a tuple,
/// zero-padded to `N` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenericKey<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> GenericKey<N> {
    pub fn from_tuple(tuple: &Tuple) -> Self {
        let bytes = tuple.data();
        assert!(
            bytes.len() <= N,
            "key of {} bytes does not fit in GenericKey<{}>",
            bytes.len(),
            N
        );
        let mut data = [0u8; N];
        data[..bytes.len()].copy_from_slice(bytes);
        Self { data }
    }

    pub fn data(&self) -> &[u8; N] {
        &self.data
    }
}

impl<const N: usize> PageCodec for GenericKey<N> {
    const ENCODED_SIZE: usize = N;

    fn encode(&self, buf: &mut [u8]) {
        buf[..N].copy_from_slice(&self.data);
    }

    fn decode(buf: &[u8]) -> Self {
        let mut data = [0u8; N];
        data.copy_from_slice(&buf[..N]);
        Self { data }
    }
}

/// Byte-wise comparator for [`GenericKey`]. Keys serialized from equal
/// column values compare equal, which is all the hash table requires.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericComparator<const N: usize>;

impl<const N: usize> KeyComparator<GenericKey<N>> for GenericComparator<N> {
    fn compare(&self, lhs: &GenericKey<N>, rhs: &GenericKey<N>) -> Ordering {
        lhs.data.cmp(&rhs.data)
    }
}
