use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime, macros::datetime};

use crate::{
    customer::Customer,
    db::initialize,
    ledger::{CustomerLocks, Ledger, apply},
    stores::sqlite::SQLiteCustomerStore,
    transaction::{Transaction, TransactionInput, TransactionType},
};

/// The date of the first transaction built by [transaction] and [transactions].
pub(crate) const FIRST_DATE: OffsetDateTime = datetime!(2025-10-01 09:00 UTC);

/// A transaction with a zero balance snapshot.
pub(crate) fn transaction(id: i64, kind: TransactionType, amount: Decimal) -> Transaction {
    Transaction {
        id,
        customer_id: 1,
        date: FIRST_DATE + Duration::hours(id),
        kind,
        amount,
        balance_after: Decimal::ZERO,
        description: None,
    }
}

/// A ledger with IDs starting at 1, one hour apart and with snapshots that
/// match recording the transactions in order.
pub(crate) fn transactions(entries: &[(TransactionType, Decimal)]) -> Vec<Transaction> {
    let mut balance = Decimal::ZERO;

    entries
        .iter()
        .enumerate()
        .map(|(index, (kind, amount))| {
            balance = apply(balance, *kind, *amount);

            Transaction {
                balance_after: balance,
                ..transaction(index as i64 + 1, *kind, *amount)
            }
        })
        .collect()
}

/// Customer 1 with a consistent ledger built by [transactions].
pub(crate) fn customer_with(entries: &[(TransactionType, Decimal)]) -> Customer {
    let transactions = transactions(entries);
    let balance = transactions
        .last()
        .map_or(Decimal::ZERO, |transaction| transaction.balance_after);

    Customer {
        id: 1,
        name: "Asha".to_owned(),
        phone: "9876543210".to_owned(),
        balance,
        transactions,
        created_at: datetime!(2025-09-01 08:00 UTC),
    }
}

/// The input for a new transaction without a date or description.
pub(crate) fn input(kind: &str, amount: Decimal) -> TransactionInput {
    TransactionInput {
        kind: kind.to_owned(),
        amount,
        description: None,
        date: None,
    }
}

pub(crate) fn get_test_connection() -> Arc<Mutex<Connection>> {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    Arc::new(Mutex::new(connection))
}

/// A ledger backed by a fresh in-memory database.
pub(crate) fn get_test_ledger() -> Ledger<SQLiteCustomerStore> {
    Ledger::new(
        SQLiteCustomerStore::new(get_test_connection()),
        CustomerLocks::default(),
    )
}
