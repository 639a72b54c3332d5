use derive_new::new;

use crate::execution::plans::PlanNode;

/// Emits at most `limit` child tuples after discarding `offset` of them.
#[derive(Debug, new)]
pub struct LimitPlanNode {
    pub child: Box<PlanNode>,
    pub limit: usize,
    pub offset: usize,
}
