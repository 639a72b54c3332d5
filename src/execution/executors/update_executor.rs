use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::catalog::{IndexInfo, Schema, TableInfo};
use crate::common::rid::Rid;
use crate::concurrency::transaction::Transaction;
use crate::dbtype::Value;
use crate::execution::executor_context::ExecutorContext;
use crate::execution::executors::Executor;
use crate::execution::plans::update::{UpdateAction, UpdatePlanNode};
use crate::storage::table::tuple::Tuple;

/// UpdateExecutor rewrites every tuple produced by its child: columns named
/// in the plan's update attributes are set or incremented, the rest copied.
/// Index entries follow the rewrite, old entry out, new entry in.
pub struct UpdateExecutor<'a> {
    plan: &'a UpdatePlanNode,
    table_info: Arc<TableInfo>,
    indexes: Vec<Arc<IndexInfo>>,
    child: Box<dyn Executor + 'a>,
    txn: &'a Transaction,
}

impl<'a> UpdateExecutor<'a> {
    pub fn new(
        ctx: &ExecutorContext<'a>,
        plan: &'a UpdatePlanNode,
        child: Box<dyn Executor + 'a>,
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
        })
    }

    fn generate_updated_tuple(&self, src_tuple: &Tuple) -> Result<Tuple> {
        let schema = &self.table_info.schema;
        let mut values = Vec::with_capacity(schema.column_count());
        for idx in 0..schema.column_count() {
            let old_value = src_tuple.value_at(schema, idx);
            let new_value = match self.plan.update_attrs.get(&idx) {
                None => old_value,
                Some(UpdateAction::Set(value)) => *value,
                Some(UpdateAction::Add(amount)) => old_value.add(&Value::integer(*amount))?,
            };
            values.push(new_value);
        }
        Ok(Tuple::from_values(&values, schema))
    }
}

impl Executor for UpdateExecutor<'_> {
    fn init(&mut self) -> Result<()> {
        self.child.init()
    }

    fn next(&mut self, tuple: &mut Tuple, rid: &mut Rid) -> Result<bool> {
        if !self.child.next(tuple, rid)? {
            return Ok(false);
        }
        let updated_tuple = self.generate_updated_tuple(tuple)?;
        self.table_info
            .table
            .update_tuple(&updated_tuple, *rid, self.txn);
        for index_info in &self.indexes {
            index_info.index.delete_entry(tuple, *rid, self.txn);
            index_info.index.insert_entry(&updated_tuple, *rid, self.txn);
        }
        *tuple = updated_tuple;
        Ok(true)
    }

    fn output_schema(&self) -> &Schema {
        &self.table_info.schema
    }
}
