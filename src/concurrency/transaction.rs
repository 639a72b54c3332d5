use std::sync::atomic::{AtomicU32, Ordering};

use crate::common::config::TransactionId;

/// An opaque transaction handle, threaded through every mutating storage
/// call. Locking and logging live elsewhere; executors only forward it.
#[derive(Debug)]
pub struct Transaction {
    id: TransactionId,
}

impl Transaction {
    pub fn new(id: TransactionId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }
}

/// Hands out transactions with process-unique ids.
#[derive(Debug, Default)]
pub struct TransactionManager {
    next_txn_id: AtomicU32,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Transaction {
        Transaction::new(self.next_txn_id.fetch_add(1, Ordering::SeqCst))
    }
}
