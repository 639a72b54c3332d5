use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};

use anyhow::Result;
use lazy_static::lazy_static;

use crate::catalog::schema::Schema;
use crate::common::rid::Rid;
use crate::dbtype::Value;
use crate::storage::table::tuple::Tuple;

pub mod aggregation_executor;
pub mod delete_executor;
pub mod distinct_executor;
pub mod hash_join_executor;
pub mod insert_executor;
pub mod limit_executor;
pub mod nested_loop_join_executor;
pub mod seq_scan_executor;
pub mod update_executor;

pub use aggregation_executor::AggregationExecutor;
pub use delete_executor::DeleteExecutor;
pub use distinct_executor::DistinctExecutor;
pub use hash_join_executor::HashJoinExecutor;
pub use insert_executor::InsertExecutor;
pub use limit_executor::LimitExecutor;
pub use nested_loop_join_executor::NestedLoopJoinExecutor;
pub use seq_scan_executor::SeqScanExecutor;
pub use update_executor::UpdateExecutor;

/// The uniform pull contract every operator implements. The engine calls
/// `init` once, then drains `next` until it returns false; `next` keeps
/// returning false after end-of-stream.
pub trait Executor {
    fn init(&mut self) -> Result<()>;

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool>;

    fn output_schema(&self) -> &Schema;
}

lazy_static! {
    /// One hash state per process, so hash join and distinct agree on
    /// bucket placement across operators of the same query.
    static ref VALUE_HASH_STATE: RandomState = RandomState::new();
}

/// Hashes the string representations of a sequence of values into one
/// bucket key. Collisions are possible, so callers must compare the
/// underlying values before treating two tuples as equal.
pub fn hash_values(values: &[Value]) -> u64 {
    let mut hasher = VALUE_HASH_STATE.build_hasher();
    for value in values {
        value.to_string().hash(&mut hasher);
    }
    hasher.finish()
}
