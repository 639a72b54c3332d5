use derive_new::new;

use crate::common::config::TableOid;
use crate::dbtype::Value;
use crate::execution::plans::PlanNode;

/// Inserts tuples into a table, either from embedded raw values or pulled
/// from a child plan.
#[derive(Debug, new)]
pub struct InsertPlanNode {
    pub table_oid: TableOid,
    pub raw_values: Vec<Vec<Value>>,
    pub child: Option<Box<PlanNode>>,
}

impl InsertPlanNode {
    pub fn is_raw_insert(&self) -> bool {
        self.child.is_none()
    }
}
