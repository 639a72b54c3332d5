use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::catalog::{IndexInfo, Schema, TableInfo};
use crate::common::rid::Rid;
use crate::concurrency::transaction::Transaction;
use crate::execution::executor_context::ExecutorContext;
use crate::execution::executors::Executor;
use crate::execution::plans::insert::InsertPlanNode;
use crate::storage::table::tuple::Tuple;

/// InsertExecutor adds tuples to a table and mirrors each insertion into
/// every index registered on that table.
///
/// Raw inserts materialise one tuple per embedded value row; pipelined
/// inserts pull already-formed tuples from a child executor.
pub struct InsertExecutor<'a> {
    plan: &'a InsertPlanNode,
    table_info: Arc<TableInfo>,
    indexes: Vec<Arc<IndexInfo>>,
    child: Option<Box<dyn Executor + 'a>>,
    txn: &'a Transaction,
    insert_idx: usize,
}

impl<'a> InsertExecutor<'a> {
    pub fn new(
        ctx: &ExecutorContext<'a>,
        plan: &'a InsertPlanNode,
        child: Option<Box<dyn Executor + 'a>>,
    ) -> Result<Self> {
        let table_info = ctx
            .catalog
            .table(plan.table_oid)
            .ok_or_else(|| anyhow!("unknown table oid {}", plan.table_oid))?;
        let indexes = ctx.catalog.table_indexes(&table_info.name);
        Ok(Self {
            plan,
            table_info,
            indexes,
            child,
            txn: ctx.txn,
            insert_idx: 0,
        })
    }

    fn insert(&self, tuple: &Tuple) -> Result<Rid> {
        let rid = self
            .table_info
            .table
            .insert_tuple(tuple, self.txn)
            .ok_or_else(|| anyhow!("table {} is out of space", self.table_info.name))?;
        for index_info in &self.indexes {
            index_info.index.insert_entry(tuple, rid, self.txn);
        }
        Ok(rid)
    }
}

impl Executor for InsertExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.insert_idx = 0;
        if let Some(child) = self.child.as_mut() {
            child.init()?;
        }
        Ok(())
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        if self.plan.is_raw_insert() {
            let Some(raw_value) = self.plan.raw_values.get(self.insert_idx) else {
                return Ok(false);
            };
            self.insert_idx += 1;
            let new_tuple = Tuple::from_values(raw_value, &self.table_info.schema);
            *rid = self.insert(&new_tuple)?;
            *tuple = new_tuple;
            return Ok(true);
        }

        let child = self
            .child
            .as_mut()
            .ok_or_else(|| anyhow!("pipelined insert has no child executor"))?;
        if !child.next(tuple, rid)? {
            return Ok(false);
        }
        *rid = self.insert(tuple)?;
        Ok(true)
    }

    fn output_schema(&self) -> &Schema {
        &self.table_info.schema
    }
}
