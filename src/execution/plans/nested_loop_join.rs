use derive_new::new;

use crate::catalog::schema::Schema;
use crate::execution::expressions::Expression;
use crate::execution::plans::PlanNode;

/// Joins two child plans by iterating the right side once per left tuple.
/// The optional predicate is evaluated over each pair; the output schema is
/// the left columns followed by the right columns.
#[derive(Debug, new)]
pub struct NestedLoopJoinPlanNode {
    pub output_schema: Schema,
    pub left: Box<PlanNode>,
    pub right: Box<PlanNode>,
    pub predicate: Option<Expression>,
}
