//! Defines the endpoint for editing a recorded transaction.

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
    transaction::TransactionPatch,
};

/// A route handler for editing the amount, description or date of a
/// transaction, responds with the updated customer.
///
/// An unknown transaction leaves the customer unchanged.
pub async fn edit_transaction_endpoint(
    State(ledger): State<Ledger<SQLiteCustomerStore>>,
    Path((customer_id, transaction_id)): Path<(CustomerId, TransactionId)>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<Customer>, Error> {
    ledger
        .update_transaction(customer_id, transaction_id, &patch)
        .await
        .map(Json)
}
