use anyhow::Result;

use crate::catalog::Schema;
use crate::common::rid::Rid;
use crate::execution::executors::Executor;
use crate::execution::plans::limit::LimitPlanNode;
use crate::storage::table::tuple::Tuple;

/// LimitExecutor discards the plan's offset worth of child tuples during
/// `init`, then passes through at most `limit` tuples.
pub struct LimitExecutor<'a> {
    plan: &'a LimitPlanNode,
    child: Box<dyn Executor + 'a>,
    emitted: usize,
}

impl<'a> LimitExecutor<'a> {
    pub fn new(plan: &'a LimitPlanNode, child: Box<dyn Executor + 'a>) -> Self {
        Self {
            plan,
            child,
            emitted: 0,
        }
    }
}

impl Executor for LimitExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.child.init()?;
        self.emitted = 0;

        let mut tuple = Tuple::default();
        let mut rid = Rid::default();
        for _ in 0..self.plan.offset {
            if !self.child.next(&mut tuple, &mut rid)? {
                break;
            }
        }
        Ok(())
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        if self.emitted >= self.plan.limit {
            return Ok(false);
        }
        if !self.child.next(tuple, rid)? {
            return Ok(false);
        }
        self.emitted += 1;
        Ok(true)
    }

    fn output_schema(&self) -> &Schema {
        self.child.output_schema()
    }
}
