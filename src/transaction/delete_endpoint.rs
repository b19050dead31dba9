//! Defines the endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    customer::Customer,
    database_id::{CustomerId, TransactionId},
    ledger::Ledger,
    stores::sqlite::SQLiteCustomerStore,
};

/// A route handler for deleting a transaction, responds with the updated customer.
///
/// Deleting a transaction that does not exist is not an error.
pub async fn delete_transaction_endpoint(
    State(ledger): State<Ledger<SQLiteCustomerStore>>,
    Path((customer_id, transaction_id)): Path<(CustomerId, TransactionId)>,
) -> Result<Json<Customer>, Error> {
    ledger
        .delete_transaction(customer_id, transaction_id)
        .await
        .map(Json)
}
