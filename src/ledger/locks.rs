//! A registry of per-customer locks that serializes writes to one customer's ledger.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

use crate::database_id::CustomerId;

/// Hands out one lock per customer ID, created the first time it is asked for.
///
/// Every customer lock also holds a shared gate, so [CustomerLocks::lock_all]
/// waits for writes in flight and blocks new ones until it is dropped.
///
/// Cloning the registry shares the same locks.
#[derive(Debug, Clone, Default)]
pub struct CustomerLocks {
    gate: Arc<RwLock<()>>,
    locks: Arc<DashMap<CustomerId, Arc<Mutex<()>>>>,
}

/// Exclusive access to one customer's ledger.
#[derive(Debug)]
pub struct CustomerGuard {
    _customer: OwnedMutexGuard<()>,
    _gate: OwnedRwLockReadGuard<()>,
}

impl CustomerLocks {
    /// Wait for exclusive access to the ledger of `customer_id`.
    ///
    /// The access lasts until the returned guard is dropped.
    pub async fn lock(&self, customer_id: CustomerId) -> CustomerGuard {
        let gate = self.gate.clone().read_owned().await;
        let lock = self.locks.entry(customer_id).or_default().clone();

        CustomerGuard {
            _customer: lock.lock_owned().await,
            _gate: gate,
        }
    }

    /// Wait until no customer is locked and keep every customer locked
    /// until the returned guard is dropped.
    pub async fn lock_all(&self) -> OwnedRwLockWriteGuard<()> {
        self.gate.clone().write_owned().await
    }

    /// Drop the lock of a deleted customer.
    ///
    /// Callers waiting on the old lock still get it, and the next call to
    /// [CustomerLocks::lock] creates a fresh one.
    pub fn forget(&self, customer_id: CustomerId) {
        self.locks.remove(&customer_id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}
