//! Defines the endpoint for creating a customer.

use axum::{Json, extract::State, http::StatusCode};
use time::OffsetDateTime;

use crate::{
    Error,
    customer::{Customer, CustomerForm},
    ledger::Ledger,
    stores::sqlite::SQLiteCustomerStore,
};

/// A route handler for creating a new customer, responds with the customer
/// and its opening transaction, if any.
pub async fn create_customer_endpoint(
    State(ledger): State<Ledger<SQLiteCustomerStore>>,
    Json(form): Json<CustomerForm>,
) -> Result<(StatusCode, Json<Customer>), Error> {
    let customer = ledger
        .create_customer(form, OffsetDateTime::now_utc())
        .await
        .inspect_err(|error| tracing::debug!("could not create customer: {error}"))?;

    Ok((StatusCode::CREATED, Json(customer)))
}
