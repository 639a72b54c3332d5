pub mod hash;

pub use hash::extendible_hash_table::ExtendibleHashTable;
