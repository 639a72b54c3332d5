use anyhow::Result;

use crate::catalog::Schema;
use crate::common::rid::Rid;
use crate::execution::executors::Executor;
use crate::execution::plans::nested_loop_join::NestedLoopJoinPlanNode;
use crate::storage::table::tuple::Tuple;

/// NestedLoopJoinExecutor pairs every left tuple with every right tuple,
/// re-initializing the right child once per left advance, and emits the
/// concatenation of each pair that passes the join predicate.
pub struct NestedLoopJoinExecutor<'a> {
    plan: &'a NestedLoopJoinPlanNode,
    left: Box<dyn Executor + 'a>,
    right: Box<dyn Executor + 'a>,
    left_tuple: Option<Tuple>,
}

impl<'a> NestedLoopJoinExecutor<'a> {
    pub fn new(
        plan: &'a NestedLoopJoinPlanNode,
        left: Box<dyn Executor + 'a>,
        right: Box<dyn Executor + 'a>,
    ) -> Self {
        Self {
            plan,
            left,
            right,
            left_tuple: None,
        }
    }

    fn join_tuple(&self, left: &Tuple, right: &Tuple) -> Tuple {
        let mut values = left.values(self.left.output_schema());
        values.extend(right.values(self.right.output_schema()));
        Tuple::from_values(&values, &self.plan.output_schema)
    }
}

impl Executor for NestedLoopJoinExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.left.init()?;
        self.right.init()?;
        self.left_tuple = None;
        Ok(())
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        loop {
            if self.left_tuple.is_none() {
                let mut left_tuple = Tuple::default();
                let mut left_rid = Rid::default();
                if !self.left.next(&mut left_tuple, &mut left_rid)? {
                    return Ok(false);
                }
                self.left_tuple = Some(left_tuple);
            }

            let mut right_tuple = Tuple::default();
            let mut right_rid = Rid::default();
            if !self.right.next(&mut right_tuple, &mut right_rid)? {
                // right side exhausted for this left tuple; rewind and advance
                self.right.init()?;
                self.left_tuple = None;
                continue;
            }

            let Some(left_tuple) = self.left_tuple.as_ref() else {
                continue;
            };
            let passes = match &self.plan.predicate {
                Some(predicate) => predicate
                    .evaluate_join(
                        left_tuple,
                        self.left.output_schema(),
                        &right_tuple,
                        self.right.output_schema(),
                    )?
                    .as_boolean()?,
                None => true,
            };
            if passes {
                *tuple = self.join_tuple(left_tuple, &right_tuple);
                *rid = Rid::default();
                return Ok(true);
            }
        }
    }

    fn output_schema(&self) -> &Schema {
        &self.plan.output_schema
    }
}
