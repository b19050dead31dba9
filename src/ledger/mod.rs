//! The outstanding balance rules and the operations that keep each customer's
//! balance consistent with their transactions.

mod engine;
mod locks;
mod service;

pub use engine::{
    apply, apply_new_transaction, fold, prepare_transaction, remove_transaction,
    update_transaction,
};
pub use locks::CustomerLocks;
pub use service::{Ledger, OPENING_BALANCE_DESCRIPTION};
