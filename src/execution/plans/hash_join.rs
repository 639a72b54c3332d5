use derive_new::new;

use crate::catalog::schema::Schema;
use crate::execution::expressions::Expression;
use crate::execution::plans::PlanNode;

/// Equi-joins two child plans by hashing the left side on its key
/// expression and probing with the right side's key.
#[derive(Debug, new)]
pub struct HashJoinPlanNode {
    pub output_schema: Schema,
    pub left: Box<PlanNode>,
    pub right: Box<PlanNode>,
    pub left_key: Expression,
    pub right_key: Expression,
}
