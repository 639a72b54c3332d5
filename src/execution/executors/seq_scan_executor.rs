use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::catalog::{Schema, TableInfo};
use crate::common::rid::Rid;
use crate::execution::executor_context::ExecutorContext;
use crate::execution::executors::Executor;
use crate::execution::plans::seq_scan::SeqScanPlanNode;
use crate::storage::table::table_heap::TableIterator;
use crate::storage::table::tuple::Tuple;

/// SeqScanExecutor walks a table heap front to back, emitting every tuple
/// that passes the plan's optional predicate.
pub struct SeqScanExecutor<'a> {
    plan: &'a SeqScanPlanNode,
    table_info: Arc<TableInfo>,
    iter: Option<TableIterator>,
}

impl<'a> SeqScanExecutor<'a> {
    pub fn new(ctx: &ExecutorContext<'a>, plan: &'a SeqScanPlanNode) -> Result<Self> {
        let table_info = ctx
            .catalog
            .table(plan.table_oid)
            .ok_or_else(|| anyhow!("unknown table oid {}", plan.table_oid))?;
        Ok(Self {
            plan,
            table_info,
            iter: None,
        })
    }
}

impl Executor for SeqScanExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.iter = Some(self.table_info.table.iter());
        Ok(())
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        let iter = self
            .iter
            .as_mut()
            .ok_or_else(|| anyhow!("seq scan executor not initialized"))?;
        for (next_rid, next_tuple) in iter {
            let passes = match &self.plan.predicate {
                Some(predicate) => predicate
                    .evaluate(&next_tuple, &self.plan.output_schema)?
                    .as_boolean()?,
                None => true,
            };
            if passes {
                *tuple = next_tuple;
                *rid = next_rid;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn output_schema(&self) -> &Schema {
        &self.plan.output_schema
    }
}
