use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hashes a key and downcasts the 64-bit result to the 32 bits used for
/// directory indexing. `DefaultHasher::new` is keyed deterministically, so
/// hashes are stable across runs and pages can persist.
pub fn hash_key<K: Hash>(key: &K) -> u32 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        for k in 0..100i32 {
            assert_eq!(hash_key(&k), hash_key(&k));
        }
    }
}
