//! Creates the application's database schema.

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error, customer::create_customer_table, settings::create_business_settings_table,
    transaction::create_transaction_table,
};

/// Create all of the database tables for the application.
///
/// Tables are only created if they do not already exist, so it is safe to
/// call this function on an existing database.
///
/// # Errors
/// This function may return an [Error::SqlError] if something went wrong creating the tables.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;

    create_customer_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_business_settings_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a decimal value that was stored as text.
///
/// # Errors
/// Returns an error if the column cannot be read as text or the text is not a valid decimal.
pub(crate) fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    text.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}
