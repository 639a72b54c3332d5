pub mod table_heap;
pub mod tuple;

pub use table_heap::{TableHeap, TableIterator};
pub use tuple::Tuple;
