//! The business details shown on receipts and exports.
//!
//! The settings are a single row that always exists once the table has been
//! created, so reads never return [Error::NotFound].

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// The owner's business details.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessSettings {
    /// The shop or company name.
    pub business_name: String,
    /// The name of the person running the business.
    pub owner_name: String,
    /// The business contact number.
    pub phone: String,
    /// The postal address.
    pub address: String,
}

/// Create the business settings table and its single row of empty values.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_business_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS business_settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            business_name TEXT NOT NULL DEFAULT '',
            owner_name TEXT NOT NULL DEFAULT '',
            phone TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL DEFAULT ''
        )",
        (),
    )?;

    connection.execute(
        "INSERT OR IGNORE INTO business_settings (id) VALUES (1)",
        (),
    )?;

    Ok(())
}

fn map_settings_row(row: &Row) -> Result<BusinessSettings, rusqlite::Error> {
    Ok(BusinessSettings {
        business_name: row.get(0)?,
        owner_name: row.get(1)?,
        phone: row.get(2)?,
        address: row.get(3)?,
    })
}

/// Get the business settings.
///
/// # Errors
/// Returns [Error::SqlError] if the settings could not be read.
pub fn get_business_settings(connection: &Connection) -> Result<BusinessSettings, Error> {
    connection
        .prepare_cached(
            "SELECT business_name, owner_name, phone, address
             FROM business_settings WHERE id = 1",
        )?
        .query_row([], map_settings_row)
        .map_err(Error::from)
}

/// Replace every field of the business settings.
///
/// # Errors
/// Returns [Error::SqlError] if the settings could not be written.
pub fn save_business_settings(
    settings: &BusinessSettings,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO business_settings (id, business_name, owner_name, phone, address)
         VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            business_name = excluded.business_name,
            owner_name = excluded.owner_name,
            phone = excluded.phone,
            address = excluded.address",
        (
            &settings.business_name,
            &settings.owner_name,
            &settings.phone,
            &settings.address,
        ),
    )?;

    Ok(())
}

/// The state needed to read and write the business settings.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// The database connection holding the settings table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the business settings.
pub async fn get_settings_endpoint(
    State(state): State<SettingsState>,
) -> Result<Json<BusinessSettings>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_business_settings(&connection).map(Json)
}

/// A route handler that replaces the business settings and responds with
/// the saved values.
///
/// Fields missing from the request body are saved as empty strings.
pub async fn update_settings_endpoint(
    State(state): State<SettingsState>,
    Json(settings): Json<BusinessSettings>,
) -> Result<Json<BusinessSettings>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    save_business_settings(&settings, &connection)
        .inspect_err(|error| tracing::error!("could not save business settings: {error}"))?;
    tracing::info!("updated business settings");

    Ok(Json(settings))
}
