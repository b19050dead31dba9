//! Downloading every customer as a JSON backup and restoring from one.

use axum::{
    Json,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AppState, Error, customer::Customer, ledger::Ledger, stores::sqlite::SQLiteCustomerStore,
    timezone::local_today,
};

/// A copy of every customer and their transactions.
///
/// Balances and balance snapshots are kept exactly as stored, restoring a
/// backup does not recompute them.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// The customers in ID order, each with its full ledger.
    #[serde(default)]
    pub customers: Vec<Customer>,
}

/// The state needed to create and restore backups.
#[derive(Debug, Clone)]
pub struct BackupState {
    /// The ledger to read from and restore into.
    pub ledger: Ledger<SQLiteCustomerStore>,
    /// The local timezone as a canonical timezone name, used to date the backup file.
    pub local_timezone: String,
}

impl FromRef<AppState> for BackupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: Ledger::from_ref(state),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn backup_file_name(local_timezone: &str) -> Result<String, Error> {
    Ok(format!(
        "credit-manager-backup-{}.json",
        local_today(local_timezone)?
    ))
}

/// A route handler that responds with every customer as a JSON file download.
pub async fn get_backup_endpoint(State(state): State<BackupState>) -> Result<Response, Error> {
    let customers = state.ledger.list_customers()?;
    let file_name = backup_file_name(&state.local_timezone)?;

    let body = serde_json::to_string_pretty(&Backup { customers })
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok((
        [
            (CONTENT_TYPE, "application/json".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// A route handler that replaces every customer with the ones in the backup.
///
/// Nothing is replaced if any customer in the backup cannot be stored.
pub async fn restore_backup_endpoint(
    State(state): State<BackupState>,
    Json(backup): Json<Backup>,
) -> Result<Json<Value>, Error> {
    state.ledger.restore(&backup.customers).await?;

    Ok(Json(json!({
        "success": true,
        "customers": backup.customers.len(),
    })))
}
