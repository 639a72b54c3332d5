use derive_new::new;

use crate::catalog::schema::Schema;
use crate::common::config::TableOid;
use crate::execution::expressions::Expression;

/// Scans a table heap, emitting each tuple for which the optional predicate
/// holds.
#[derive(Debug, new)]
pub struct SeqScanPlanNode {
    pub output_schema: Schema,
    pub table_oid: TableOid,
    pub predicate: Option<Expression>,
}
