use derive_new::new;

use crate::common::config::TableOid;
use crate::execution::plans::PlanNode;

/// Deletes every tuple produced by the child plan, typically a scan.
#[derive(Debug, new)]
pub struct DeletePlanNode {
    pub table_oid: TableOid,
    pub child: Box<PlanNode>,
}
