use std::collections::HashMap;

use anyhow::Result;

use crate::catalog::Schema;
use crate::common::rid::Rid;
use crate::execution::executors::{hash_values, Executor};
use crate::execution::plans::hash_join::HashJoinPlanNode;
use crate::storage::table::tuple::Tuple;

/// HashJoinExecutor builds a hash table over the left child's join keys,
/// probes it with each right tuple, and stashes the joined results during
/// `init`. Bucket lookup goes by hash, but equality is decided by comparing
/// the key values themselves, so colliding keys never join.
pub struct HashJoinExecutor<'a> {
    plan: &'a HashJoinPlanNode,
    left: Box<dyn Executor + 'a>,
    right: Box<dyn Executor + 'a>,
    results: Vec<Tuple>,
    cursor: usize,
}

impl<'a> HashJoinExecutor<'a> {
    pub fn new(
        plan: &'a HashJoinPlanNode,
        left: Box<dyn Executor + 'a>,
        right: Box<dyn Executor + 'a>,
    ) -> Self {
        Self {
            plan,
            left,
            right,
            results: Vec::new(),
            cursor: 0,
        }
    }
}

impl Executor for HashJoinExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.left.init()?;
        self.right.init()?;
        self.results.clear();
        self.cursor = 0;

        // build phase: bucket every left tuple by its join key hash
        let mut hash_table: HashMap<u64, Vec<Tuple>> = HashMap::new();
        let mut tuple = Tuple::default();
        let mut rid = Rid::default();
        while self.left.next(&mut tuple, &mut rid)? {
            let key = self
                .plan
                .left_key
                .evaluate(&tuple, self.left.output_schema())?;
            hash_table
                .entry(hash_values(&[key]))
                .or_default()
                .push(tuple.clone());
        }

        // probe phase: join each right tuple against its bucket
        let left_schema = self.left.output_schema().clone();
        let right_schema = self.right.output_schema().clone();
        while self.right.next(&mut tuple, &mut rid)? {
            let right_key = self.plan.right_key.evaluate(&tuple, &right_schema)?;
            let Some(bucket) = hash_table.get(&hash_values(&[right_key])) else {
                continue;
            };
            for left_tuple in bucket {
                let left_key = self.plan.left_key.evaluate(left_tuple, &left_schema)?;
                // hash buckets may mix colliding keys
                if left_key != right_key {
                    continue;
                }
                let mut values = left_tuple.values(&left_schema);
                values.extend(tuple.values(&right_schema));
                self.results
                    .push(Tuple::from_values(&values, &self.plan.output_schema));
            }
        }
        Ok(())
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        let Some(result) = self.results.get(self.cursor) else {
            return Ok(false);
        };
        self.cursor += 1;
        *tuple = result.clone();
        *rid = Rid::default();
        Ok(true)
    }

    fn output_schema(&self) -> &Schema {
        &self.plan.output_schema
    }
}
