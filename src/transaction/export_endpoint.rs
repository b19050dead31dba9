//! Defines the endpoint for downloading the transaction listing as CSV.

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use time::UtcOffset;

use crate::{
    Error,
    html::{format_date, format_indian_number},
    timezone::{get_local_offset, local_today},
    transaction::{
        list_endpoint::ListingState,
        listing::{ListingQuery, TransactionRow},
    },
};

const CSV_HEADERS: [&str; 4] = ["Date", "Customer", "Type", "Amount (₹)"];

/// A route handler that responds with every transaction matching the query
/// parameters as a CSV file, ignoring pagination.
pub async fn export_transactions_endpoint(
    State(state): State<ListingState>,
    Query(query): Query<ListingQuery>,
) -> Result<Response, Error> {
    let (_, listing) = state.load(&query)?;

    let offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let csv = write_csv(&listing.rows, offset)?;
    let file_name = format!("transactions_{}.csv", local_today(&state.local_timezone)?);

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Write `rows` as CSV with dates in the local timezone and amounts in whole rupees.
fn write_csv(rows: &[TransactionRow], offset: UtcOffset) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|error| Error::InvalidCSV(error.to_string()))?;

    for row in rows {
        writer
            .write_record([
                format_date(row.transaction.date.to_offset(offset).date()),
                row.customer_name.clone(),
                row.transaction.kind.to_string(),
                format_indian_number(row.transaction.amount, 0),
            ])
            .map_err(|error| Error::InvalidCSV(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::InvalidCSV(error.to_string()))
}
