use std::collections::HashMap;

use anyhow::Result;

use crate::catalog::Schema;
use crate::common::rid::Rid;
use crate::dbtype::Value;
use crate::execution::executors::{hash_values, Executor};
use crate::storage::table::tuple::Tuple;

/// DistinctExecutor removes duplicate rows from its child's output. Rows
/// are bucketed by the hash of their column values; within a bucket the
/// decoded values are compared directly, so hash collisions cannot conflate
/// distinct rows.
pub struct DistinctExecutor<'a> {
    child: Box<dyn Executor + 'a>,
    distinct: Vec<Tuple>,
    cursor: usize,
}

impl<'a> DistinctExecutor<'a> {
    pub fn new(child: Box<dyn Executor + 'a>) -> Self {
        Self {
            child,
            distinct: Vec::new(),
            cursor: 0,
        }
    }
}

impl Executor for DistinctExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.child.init()?;
        self.distinct.clear();
        self.cursor = 0;

        let schema = self.child.output_schema().clone();
        let mut seen: HashMap<u64, Vec<Vec<Value>>> = HashMap::new();
        let mut tuple = Tuple::default();
        let mut rid = Rid::default();
        while self.child.next(&mut tuple, &mut rid)? {
            let values = tuple.values(&schema);
            let bucket = seen.entry(hash_values(&values)).or_default();
            if bucket.contains(&values) {
                continue;
            }
            bucket.push(values.clone());
            self.distinct.push(Tuple::from_values(&values, &schema));
        }
        Ok(())
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        let Some(result) = self.distinct.get(self.cursor) else {
            return Ok(false);
        };
        self.cursor += 1;
        *tuple = result.clone();
        *rid = Rid::default();
        Ok(true)
    }

    fn output_schema(&self) -> &Schema {
        self.child.output_schema()
    }
}
