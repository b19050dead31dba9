//! A health check that reports whether the database answers queries.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error};

/// The state needed to check the database.
#[derive(Debug, Clone)]
pub struct DbStatusState {
    /// The database connection to check.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DbStatusState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn check_connection(connection: &Mutex<Connection>) -> Result<(), Error> {
    let connection = connection.lock().map_err(|_| Error::DatabaseLockError)?;
    connection.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;

    Ok(())
}

/// A route handler that responds with `{"status": "connected"}`, or a 500
/// with the error message if the database cannot be queried.
pub async fn get_db_status(State(state): State<DbStatusState>) -> Response {
    match check_connection(&state.db_connection) {
        Ok(()) => Json(json!({ "status": "connected" })).into_response(),
        Err(error) => {
            tracing::error!("database status check failed: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": error.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::test_utils::{assert_status_ok, get_body_text, get_test_connection};

    use super::{DbStatusState, get_db_status};

    #[tokio::test]
    async fn reports_connected() {
        let state = DbStatusState {
            db_connection: get_test_connection(),
        };

        let response = get_db_status(State(state)).await;

        assert_status_ok(&response);
        let body: Value = serde_json::from_str(&get_body_text(response).await).unwrap();
        assert_eq!(body, json!({ "status": "connected" }));
    }

    #[tokio::test]
    async fn reports_poisoned_lock_as_error() {
        let db_connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let poisoner = db_connection.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let response = get_db_status(State(DbStatusState { db_connection })).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&get_body_text(response).await).unwrap();
        assert_eq!(
            body,
            json!({
                "status": "error",
                "message": "could not acquire the database lock",
            })
        );
    }
}
