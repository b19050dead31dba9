//! Defines the customer model and database schema.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{CustomerId, TransactionId},
    db::get_decimal,
    transaction::Transaction,
};

/// A customer and their ledger.
///
/// The balance is the amount the customer currently owes: positive when they
/// owe money, zero or negative when they are square or in credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// The ID of the customer.
    pub id: CustomerId,
    /// The customer's name.
    pub name: String,
    /// The customer's phone number, unique across all customers.
    pub phone: String,
    /// The outstanding balance, always the fold of `transactions`.
    pub balance: Decimal,
    /// The ledger in the order transactions were recorded.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// When the customer was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Customer {
    /// Get a transaction in the customer's ledger by its ID.
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }
}

/// The request body for creating a customer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    /// The customer's name, required.
    #[serde(default)]
    pub name: String,
    /// The customer's phone number, required.
    #[serde(default)]
    pub phone: String,
    /// An existing balance to carry forward into the new ledger.
    #[serde(default)]
    pub initial_balance: Option<Decimal>,
    /// The date of the carried forward balance, defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub opening_date: Option<OffsetDateTime>,
}

/// A validated customer that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    name: String,
    phone: String,
    created_at: OffsetDateTime,
}

impl NewCustomer {
    /// Validate the identity fields of a new customer.
    ///
    /// Leading and trailing whitespace is removed from `name` and `phone`.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if either field is empty.
    pub fn new(name: &str, phone: &str, created_at: OffsetDateTime) -> Result<Self, Error> {
        let name = name.trim();
        let phone = phone.trim();

        if name.is_empty() || phone.is_empty() {
            return Err(Error::InvalidInput(
                "name and phone are required".to_owned(),
            ));
        }

        Ok(Self {
            name: name.to_owned(),
            phone: phone.to_owned(),
            created_at,
        })
    }

    /// The customer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The customer's phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// When the customer was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// Create the customer table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_customer_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS customer (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                phone TEXT NOT NULL UNIQUE,
                balance TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// The columns read by [map_customer_row], in order.
pub const CUSTOMER_COLUMNS: &str = "id, name, phone, balance, created_at";

/// Map a database row to a customer with an empty ledger.
pub fn map_customer_row(row: &Row) -> Result<Customer, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let phone = row.get(2)?;
    let balance = get_decimal(row, 3)?;
    let created_at = row.get(4)?;

    Ok(Customer {
        id,
        name,
        phone,
        balance,
        transactions: Vec::new(),
        created_at,
    })
}


#[cfg(test)]
mod form_tests {
    use rust_decimal_macros::dec;

    use crate::customer::CustomerForm;

    #[test]
    fn missing_fields_default_to_empty() {
        let form: CustomerForm = serde_json::from_str(r#"{"initialBalance": "250.5"}"#).unwrap();

        assert_eq!(form.name, "");
        assert_eq!(form.phone, "");
        assert_eq!(form.initial_balance, Some(dec!(250.5)));
        assert_eq!(form.opening_date, None);
    }
}
