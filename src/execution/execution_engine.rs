use std::sync::Arc;

use tracing::warn;

use crate::buffer::BufferPoolManager;
use crate::catalog::Catalog;
use crate::common::rid::Rid;
use crate::concurrency::transaction::Transaction;
use crate::execution::executor_context::ExecutorContext;
use crate::execution::executor_factory::ExecutorFactory;
use crate::execution::plans::PlanNode;
use crate::storage::table::tuple::Tuple;

/// The ExecutionEngine executes query plans: it builds the executor tree
/// for a plan, initializes the root and pulls it until exhaustion.
///
/// Tuples are appended to the result set only for producing plan types;
/// mutating plans run for their side effects and their output is dropped.
/// An error surfacing from the tree is logged and the query reports
/// completion with whatever it had produced so far.
pub struct ExecutionEngine {
    buffer_pool_manager: Arc<dyn BufferPoolManager>,
    catalog: Arc<Catalog>,
}

impl ExecutionEngine {
    pub fn new(buffer_pool_manager: Arc<dyn BufferPoolManager>, catalog: Arc<Catalog>) -> Self {
        Self {
            buffer_pool_manager,
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Executes a plan within the given transaction, collecting produced
    /// tuples into `result_set`.
    pub fn execute(&self, plan: &PlanNode, result_set: &mut Vec<Tuple>, txn: &Transaction) -> bool {
        let ctx = ExecutorContext::new(&self.catalog, &self.buffer_pool_manager, txn);
        let mut executor = match ExecutorFactory::create_executor(&ctx, plan) {
            Ok(executor) => executor,
            Err(e) => {
                warn!("failed to build executor tree: {e:#}");
                return false;
            }
        };
        if let Err(e) = executor.init() {
            warn!("query terminated during init: {e:#}");
            return true;
        }

        let materialising = matches!(
            plan,
            PlanNode::SeqScan(_)
                | PlanNode::NestedLoopJoin(_)
                | PlanNode::HashJoin(_)
                | PlanNode::Aggregation(_)
                | PlanNode::Distinct(_)
                | PlanNode::Limit(_)
        );
        let mut tuple = Tuple::default();
        let mut rid = Rid::default();
        loop {
            match executor.next(&mut tuple, &mut rid) {
                Ok(true) => {
                    if materialising {
                        result_set.push(tuple.clone());
                    }
                }
                Ok(false) => break,
                Err(e) => {
                    warn!("query terminated early: {e:#}");
                    break;
                }
            }
        }
        true
    }
}
