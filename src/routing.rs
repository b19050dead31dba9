//! Application router configuration with the page and JSON API route definitions.

use axum::{
    Router,
    response::Redirect,
    routing::{get, patch, post},
};

use crate::{
    AppState,
    backup::{get_backup_endpoint, restore_backup_endpoint},
    customer::{
        create_customer_endpoint, delete_customer_endpoint, get_customer_endpoint,
        get_customers_page, list_customers_endpoint,
    },
    dashboard::{get_dashboard_page, get_dashboard_stats_endpoint},
    db_status::get_db_status,
    endpoints,
    not_found::get_404_not_found,
    settings::{get_settings_endpoint, update_settings_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        export_transactions_endpoint, get_transactions_page, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::CUSTOMERS_VIEW, get(get_customers_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page));

    let api_routes = Router::new()
        .route(
            endpoints::CUSTOMERS_API,
            get(list_customers_endpoint).post(create_customer_endpoint),
        )
        .route(
            endpoints::CUSTOMER,
            get(get_customer_endpoint).delete(delete_customer_endpoint),
        )
        .route(
            endpoints::CUSTOMER_TRANSACTIONS,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::CUSTOMER_TRANSACTION,
            patch(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::TRANSACTIONS_API, get(list_transactions_endpoint))
        .route(
            endpoints::TRANSACTIONS_EXPORT,
            get(export_transactions_endpoint),
        )
        .route(endpoints::DASHBOARD_API, get(get_dashboard_stats_endpoint))
        .route(
            endpoints::SETTINGS,
            get(get_settings_endpoint).put(update_settings_endpoint),
        )
        .route(
            endpoints::BACKUP,
            get(get_backup_endpoint).post(restore_backup_endpoint),
        )
        .route(endpoints::DB_STATUS, get(get_db_status));

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
