//! Defines the core data models and database schema for customer transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{CustomerId, TransactionId},
    db::get_decimal,
};

// ============================================================================
// MODELS
// ============================================================================

/// The kind of a transaction, which decides how it moves the customer's
/// outstanding balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    /// Goods sold on credit, increases what the customer owes.
    Credit,
    /// Money received from the customer, reduces what the customer owes.
    ///
    /// Deposits are recorded as payments.
    #[serde(alias = "deposit")]
    Payment,
    /// A cash sale, does not change what the customer owes.
    Cash,
    /// Sets the outstanding balance outright, used to import an opening balance.
    CarryForward,
}

impl TransactionType {
    /// Every transaction type, in the order they are shown to users.
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Credit,
        TransactionType::Cash,
        TransactionType::Payment,
        TransactionType::CarryForward,
    ];

    /// The name used for the type in JSON, the database and CSV exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Payment => "payment",
            TransactionType::Cash => "cash",
            TransactionType::CarryForward => "carry-forward",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    /// Parse a transaction type, treating "deposit" as an alias of "payment".
    ///
    /// # Errors
    /// Returns [Error::InvalidTransactionType] for any other string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(TransactionType::Credit),
            "payment" | "deposit" => Ok(TransactionType::Payment),
            "cash" => Ok(TransactionType::Cash),
            "carry-forward" => Ok(TransactionType::CarryForward),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

/// A single entry in a customer's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the customer whose ledger holds this transaction.
    pub customer_id: CustomerId,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// How the transaction affects the outstanding balance.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The size of the transaction, never negative.
    pub amount: Decimal,
    /// The customer's outstanding balance right after this transaction was recorded.
    pub balance_after: Decimal,
    /// An optional note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The request body for recording a new transaction.
///
/// The type is kept as a string so that unknown types are rejected by the
/// ledger with [Error::InvalidTransactionType] rather than by the JSON parser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionInput {
    /// One of "credit", "payment", "deposit", "cash" or "carry-forward".
    #[serde(rename = "type")]
    pub kind: String,
    /// The size of the transaction. May be sent as a JSON number or a numeric string.
    pub amount: Decimal,
    /// An optional note.
    #[serde(default)]
    pub description: Option<String>,
    /// When the transaction happened, defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// A validated transaction with its balance snapshot that has not yet been
/// given an ID by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransaction {
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// How the transaction affects the outstanding balance.
    pub kind: TransactionType,
    /// The size of the transaction.
    pub amount: Decimal,
    /// The outstanding balance after applying the transaction.
    pub balance_after: Decimal,
    /// An optional note.
    pub description: Option<String>,
}

impl PendingTransaction {
    /// Attach the ID assigned by the store and the owning customer.
    pub fn into_transaction(self, id: TransactionId, customer_id: CustomerId) -> Transaction {
        Transaction {
            id,
            customer_id,
            date: self.date,
            kind: self.kind,
            amount: self.amount,
            balance_after: self.balance_after,
            description: self.description,
        }
    }
}

impl From<&Transaction> for PendingTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: transaction.date,
            kind: transaction.kind,
            amount: transaction.amount,
            balance_after: transaction.balance_after,
            description: transaction.description.clone(),
        }
    }
}

/// The fields of a recorded transaction that may be edited in place.
///
/// Fields left as `None` keep their current value. The owning customer and
/// the balance snapshot cannot be edited.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionPatch {
    /// The new size of the transaction.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// The new note.
    #[serde(default)]
    pub description: Option<String>,
    /// The new date.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// Transactions keep an explicit position so that a customer's ledger is read
/// back in the order it was written, independent of the transaction dates.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS customer_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                date TEXT NOT NULL,
                type TEXT NOT NULL,
                amount TEXT NOT NULL,
                balance_after TEXT NOT NULL,
                description TEXT,
                FOREIGN KEY(customer_id) REFERENCES customer(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_customer_transaction_position
            ON customer_transaction(customer_id, position);",
        (),
    )?;

    Ok(())
}

/// The columns read by [map_transaction_row], in order.
pub const TRANSACTION_COLUMNS: &str =
    "id, customer_id, date, type, amount, balance_after, description";

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let customer_id = row.get(1)?;
    let date = row.get(2)?;
    let raw_kind: String = row.get(3)?;
    let kind = raw_kind.parse().map_err(|error: Error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error))
    })?;
    let amount = get_decimal(row, 4)?;
    let balance_after = get_decimal(row, 5)?;
    let description = row.get(6)?;

    Ok(Transaction {
        id,
        customer_id,
        date,
        kind,
        amount,
        balance_after,
        description,
    })
}

/// Insert `transaction` into the ledger of `customer_id` at `position`.
///
/// When `id` is `None` the database assigns a new ID.
pub(crate) fn insert_transaction_row(
    connection: &Connection,
    id: Option<TransactionId>,
    customer_id: CustomerId,
    position: usize,
    transaction: &PendingTransaction,
) -> Result<TransactionId, rusqlite::Error> {
    connection
        .prepare_cached(
            "INSERT INTO customer_transaction
                (id, customer_id, position, date, type, amount, balance_after, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id",
        )?
        .query_row(
            (
                id,
                customer_id,
                position as i64,
                transaction.date,
                transaction.kind.as_str(),
                transaction.amount.to_string(),
                transaction.balance_after.to_string(),
                &transaction.description,
            ),
            |row| row.get(0),
        )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_type_tests {
    use crate::{Error, transaction::TransactionType};

    #[test]
    fn parses_known_types() {
        assert_eq!("credit".parse(), Ok(TransactionType::Credit));
        assert_eq!("payment".parse(), Ok(TransactionType::Payment));
        assert_eq!("cash".parse(), Ok(TransactionType::Cash));
        assert_eq!("carry-forward".parse(), Ok(TransactionType::CarryForward));
    }

    #[test]
    fn deposit_is_payment() {
        assert_eq!("deposit".parse(), Ok(TransactionType::Payment));
        assert_eq!(
            serde_json::from_str::<TransactionType>("\"deposit\"").unwrap(),
            TransactionType::Payment
        );
    }

    #[test]
    fn rejects_unknown_types() {
        assert_eq!(
            "refund".parse::<TransactionType>(),
            Err(Error::InvalidTransactionType("refund".to_owned()))
        );
        assert_eq!(
            "Credit".parse::<TransactionType>(),
            Err(Error::InvalidTransactionType("Credit".to_owned()))
        );
    }

    #[test]
    fn serializes_as_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TransactionType::CarryForward).unwrap(),
            "\"carry-forward\""
        );
        assert_eq!(TransactionType::CarryForward.to_string(), "carry-forward");
    }
}
