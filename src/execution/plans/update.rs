use std::collections::HashMap;

use derive_new::new;

use crate::common::config::TableOid;
use crate::dbtype::Value;
use crate::execution::plans::PlanNode;

/// How an updated column derives its new value.
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Replace with the literal.
    Set(Value),
    /// Add the amount to the current integer value.
    Add(i32),
}

/// Rewrites every tuple produced by the child plan, applying one action per
/// updated column and copying the rest.
#[derive(Debug, new)]
pub struct UpdatePlanNode {
    pub table_oid: TableOid,
    pub update_attrs: HashMap<usize, UpdateAction>,
    pub child: Box<PlanNode>,
}
