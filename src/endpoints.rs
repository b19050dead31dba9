//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/customers/{customer_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the business overview for a month.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing the customers and their balances.
pub const CUSTOMERS_VIEW: &str = "/customers";
/// The page listing the transactions of every customer.
pub const TRANSACTIONS_VIEW: &str = "/transactions";

/// The route to list and create customers.
pub const CUSTOMERS_API: &str = "/api/customers";
/// The route to get or delete a single customer.
pub const CUSTOMER: &str = "/api/customers/{customer_id}";
/// The route to record a transaction for a customer.
pub const CUSTOMER_TRANSACTIONS: &str = "/api/customers/{customer_id}/transactions";
/// The route to edit or delete a recorded transaction.
pub const CUSTOMER_TRANSACTION: &str =
    "/api/customers/{customer_id}/transactions/{transaction_id}";
/// The route to list the transactions of every customer.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to download the transaction listing as CSV.
pub const TRANSACTIONS_EXPORT: &str = "/api/transactions/export";
/// The route for the dashboard statistics.
pub const DASHBOARD_API: &str = "/api/dashboard";
/// The route to read and replace the business settings.
pub const SETTINGS: &str = "/api/settings";
/// The route to download or restore a backup of every customer.
pub const BACKUP: &str = "/api/backup";
/// The route to check that the database is reachable.
pub const DB_STATUS: &str = "/api/db-status";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters.
/// Call it once per parameter for paths with more than one.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
