//! Defines the endpoint for deleting a customer.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error, database_id::CustomerId, ledger::Ledger, stores::sqlite::SQLiteCustomerStore,
};

/// A route handler for deleting a customer and every transaction in its ledger.
pub async fn delete_customer_endpoint(
    State(ledger): State<Ledger<SQLiteCustomerStore>>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<Value>, Error> {
    ledger.delete_customer(customer_id).await?;

    Ok(Json(json!({ "success": true })))
}
