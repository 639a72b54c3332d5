use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::catalog::{IndexInfo, Schema, TableInfo};
use crate::common::rid::Rid;
use crate::concurrency::transaction::Transaction;
use crate::execution::executor_context::ExecutorContext;
use crate::execution::executors::Executor;
use crate::execution::plans::delete::DeletePlanNode;
use crate::storage::table::tuple::Tuple;

/// DeleteExecutor removes every tuple produced by its child from the table
/// heap and from every index registered on the table.
pub struct DeleteExecutor<'a> {
    table_info: Arc<TableInfo>,
    indexes: Vec<Arc<IndexInfo>>,
    child: Box<dyn Executor + 'a>,
    txn: &'a Transaction,
}

impl<'a> DeleteExecutor<'a> {
    pub fn new(
        ctx: &ExecutorContext<'a>,
        plan: &'a DeletePlanNode,
        child: Box<dyn Executor + 'a>,
    ) -> Result<Self> {
        let table_info = ctx
            .catalog
            .table(plan.table_oid)
            .ok_or_else(|| anyhow!("unknown table oid {}", plan.table_oid))?;
        let indexes = ctx.catalog.table_indexes(&table_info.name);
        Ok(Self {
            table_info,
            indexes,
            child,
            txn: ctx.txn,
        })
    }
}

impl Executor for DeleteExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.child.init()
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        if !self.child.next(tuple, rid)? {
            return Ok(false);
        }
        self.table_info.table.apply_delete(*rid, self.txn);
        for index_info in &self.indexes {
            index_info.index.delete_entry(tuple, *rid, self.txn);
        }
        Ok(true)
    }

    fn output_schema(&self) -> &Schema {
        self.child.output_schema()
    }
}
