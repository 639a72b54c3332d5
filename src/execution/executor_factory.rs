use anyhow::Result;

use crate::execution::executor_context::ExecutorContext;
use crate::execution::executors::{
    AggregationExecutor, DeleteExecutor, DistinctExecutor, Executor, HashJoinExecutor,
    InsertExecutor, LimitExecutor, NestedLoopJoinExecutor, SeqScanExecutor, UpdateExecutor,
};
use crate::execution::plans::PlanNode;

/// Builds the executor tree for a plan tree, dispatching on the plan node
/// tag and recursing into child plans.
pub struct ExecutorFactory;

impl ExecutorFactory {
    pub fn create_executor<'a>(
        ctx: &ExecutorContext<'a>,
        plan: &'a PlanNode,
    ) -> Result<Box<dyn Executor + 'a>> {
        Ok(match plan {
            PlanNode::SeqScan(plan) => Box::new(SeqScanExecutor::new(ctx, plan)?),
            PlanNode::Insert(plan) => {
                let child = match &plan.child {
                    Some(child_plan) => Some(Self::create_executor(ctx, child_plan)?),
                    None => None,
                };
                Box::new(InsertExecutor::new(ctx, plan, child)?)
            }
            PlanNode::Delete(plan) => {
                let child = Self::create_executor(ctx, &plan.child)?;
                Box::new(DeleteExecutor::new(ctx, plan, child)?)
            }
            PlanNode::Update(plan) => {
                let child = Self::create_executor(ctx, &plan.child)?;
                Box::new(UpdateExecutor::new(ctx, plan, child)?)
            }
            PlanNode::NestedLoopJoin(plan) => {
                let left = Self::create_executor(ctx, &plan.left)?;
                let right = Self::create_executor(ctx, &plan.right)?;
                Box::new(NestedLoopJoinExecutor::new(plan, left, right))
            }
            PlanNode::HashJoin(plan) => {
                let left = Self::create_executor(ctx, &plan.left)?;
                let right = Self::create_executor(ctx, &plan.right)?;
                Box::new(HashJoinExecutor::new(plan, left, right))
            }
            PlanNode::Aggregation(plan) => {
                let child = Self::create_executor(ctx, &plan.child)?;
                Box::new(AggregationExecutor::new(plan, child))
            }
            PlanNode::Distinct(plan) => {
                let child = Self::create_executor(ctx, &plan.child)?;
                Box::new(DistinctExecutor::new(child))
            }
            PlanNode::Limit(plan) => {
                let child = Self::create_executor(ctx, &plan.child)?;
                Box::new(LimitExecutor::new(plan, child))
            }
        })
    }
}
