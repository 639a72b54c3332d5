use derive_new::new;

use crate::execution::plans::PlanNode;

/// Removes duplicate rows from the child's output.
#[derive(Debug, new)]
pub struct DistinctPlanNode {
    pub child: Box<PlanNode>,
}
