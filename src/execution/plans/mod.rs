use crate::catalog::schema::Schema;

use self::{
    aggregation::AggregationPlanNode, delete::DeletePlanNode, distinct::DistinctPlanNode,
    hash_join::HashJoinPlanNode, insert::InsertPlanNode, limit::LimitPlanNode,
    nested_loop_join::NestedLoopJoinPlanNode, seq_scan::SeqScanPlanNode, update::UpdatePlanNode,
};

pub mod aggregation;
pub mod delete;
pub mod distinct;
pub mod hash_join;
pub mod insert;
pub mod limit;
pub mod nested_loop_join;
pub mod seq_scan;
pub mod update;

/// A tagged plan tree. The executor factory dispatches on the variant; each
/// node carries its operator-specific accessors and child plans.
#[derive(Debug)]
pub enum PlanNode {
    SeqScan(SeqScanPlanNode),
    Insert(InsertPlanNode),
    Delete(DeletePlanNode),
    Update(UpdatePlanNode),
    NestedLoopJoin(NestedLoopJoinPlanNode),
    HashJoin(HashJoinPlanNode),
    Aggregation(AggregationPlanNode),
    Distinct(DistinctPlanNode),
    Limit(LimitPlanNode),
}

impl PlanNode {
    /// The schema of the tuples this plan produces, `None` for mutating
    /// plans whose output is dropped.
    pub fn output_schema(&self) -> Option<&Schema> {
        match self {
            Self::SeqScan(p) => Some(&p.output_schema),
            Self::Insert(_) => None,
            Self::Delete(_) => None,
            Self::Update(_) => None,
            Self::NestedLoopJoin(p) => Some(&p.output_schema),
            Self::HashJoin(p) => Some(&p.output_schema),
            Self::Aggregation(p) => Some(&p.output_schema),
            Self::Distinct(p) => p.child.output_schema(),
            Self::Limit(p) => p.child.output_schema(),
        }
    }
}
