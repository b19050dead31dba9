//! Defines the endpoint for recording a new transaction in a customer's ledger.

use axum::{
    Json,
    extract::{Path, State},
};
use time::OffsetDateTime;

use crate::{
    Error, customer::Customer, database_id::CustomerId, ledger::Ledger,
    stores::sqlite::SQLiteCustomerStore, transaction::TransactionInput,
};

/// A route handler for adding a transaction to the end of a customer's
/// ledger, responds with the updated customer.
pub async fn create_transaction_endpoint(
    State(ledger): State<Ledger<SQLiteCustomerStore>>,
    Path(customer_id): Path<CustomerId>,
    Json(input): Json<TransactionInput>,
) -> Result<Json<Customer>, Error> {
    ledger
        .add_transaction(customer_id, &input, OffsetDateTime::now_utc())
        .await
        .inspect_err(|error| {
            tracing::debug!("could not add transaction for customer {customer_id}: {error}")
        })
        .map(Json)
}
