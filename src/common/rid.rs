use std::fmt;

use crate::common::codec::PageCodec;
use crate::common::config::{PageId, INVALID_PAGE_ID};

/// Record identifier: the physical location of a tuple inside a table heap,
/// as a (page id, slot number) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rid {
    pub page_id: PageId,
    pub slot_num: u32,
}

impl Rid {
    pub fn new(page_id: PageId, slot_num: u32) -> Self {
        Self { page_id, slot_num }
    }

    pub fn invalid() -> Self {
        Self {
            page_id: INVALID_PAGE_ID,
            slot_num: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.page_id != INVALID_PAGE_ID
    }
}

impl Default for Rid {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_id, self.slot_num)
    }
}

impl PageCodec for Rid {
    const ENCODED_SIZE: usize = 8;

    fn encode(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.page_id.to_le_bytes());
        buf[4..8].copy_from_slice(&self.slot_num.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            page_id: PageId::from_le_bytes(buf[0..4].try_into().unwrap()),
            slot_num: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rid_codec() {
        let rid = Rid::new(42, 7);
        let mut buf = [0u8; 8];
        rid.encode(&mut buf);
        assert_eq!(rid, Rid::decode(&buf));

        let invalid = Rid::invalid();
        assert!(!invalid.is_valid());
        invalid.encode(&mut buf);
        assert_eq!(invalid, Rid::decode(&buf));
    }
}
