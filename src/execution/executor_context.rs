use std::sync::Arc;

use derive_new::new;

use crate::buffer::BufferPoolManager;
use crate::catalog::Catalog;
use crate::concurrency::transaction::Transaction;

/// Everything an executor tree needs from its surroundings: the catalog for
/// table and index lookup, the buffer pool behind them, and the transaction
/// the query runs in.
#[derive(new)]
pub struct ExecutorContext<'a> {
    pub catalog: &'a Catalog,
    pub buffer_pool_manager: &'a Arc<dyn BufferPoolManager>,
    pub txn: &'a Transaction,
}
