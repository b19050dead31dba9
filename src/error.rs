//! Defines the app level error type and its conversions to JSON responses and HTML pages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{html::error_view, not_found::get_404_not_found_response};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or held a value that cannot be used,
    /// e.g. an empty customer name or a negative amount.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The phone number is already used by another customer.
    ///
    /// Phone numbers identify customers, so no two customers may share one.
    #[error("the phone number \"{0}\" already belongs to another customer")]
    DuplicatePhone(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The transaction type is not one of credit, payment (or its alias
    /// deposit), cash or carry-forward.
    #[error("invalid transaction type: {0}")]
    InvalidTransactionType(String),

    /// A write to the database did not take effect.
    ///
    /// The in-memory and stored balances would diverge if this were ignored,
    /// so callers must treat the operation as failed.
    #[error("failed to persist changes: {0}")]
    PersistenceFailure(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A month filter could not be parsed, months must be given as `YYYY-MM`.
    #[error("invalid month \"{0}\", expected the format YYYY-MM")]
    InvalidMonth(String),

    /// The CSV export could not be written.
    #[error("could not write CSV: {0}")]
    InvalidCSV(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("customer.phone") => Error::DuplicatePhone(String::new()),
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidMonth(_) => StatusCode::BAD_REQUEST,
            Error::DuplicatePhone(_) => StatusCode::CONFLICT,
            Error::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as a full HTML page for the server-rendered views.
    pub(crate) fn into_page_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidMonth(month) => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Bad Request",
                    "400",
                    &format!("Invalid month \"{month}\"."),
                    "Pick a month using the month selector.",
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_view(
                    "Internal Server Error",
                    "500",
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                ),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_view(
                        "Internal Server Error",
                        "500",
                        "Sorry, something went wrong.",
                        "Try again later or check the server logs",
                    ),
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match self {
            Error::DuplicatePhone(_) => "Phone number already exists".to_owned(),
            Error::NotFound => "Customer not found".to_owned(),
            Error::InvalidInput(_) | Error::InvalidTransactionType(_) | Error::InvalidMonth(_) => {
                self.to_string()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                "Internal server error".to_owned()
            }
        };

        (status_code, Json(json!({ "message": message }))).into_response()
    }
}
