//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard totals as JSON
//! - The route handler and view for the dashboard page
//! - The state used by the handlers

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Serialize;
use time::UtcOffset;

use crate::{
    AppState, Error,
    customer::Customer,
    dashboard::{
        cards::stats_cards_view,
        stats::{DashboardStats, RECENT_TRANSACTION_LIMIT, dashboard_stats, recent_transactions},
        tables::recent_transactions_table,
    },
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    ledger::Ledger,
    month::{MonthFilter, MonthQuery},
    navigation::NavBar,
    stores::sqlite::SQLiteCustomerStore,
    timezone::get_local_offset,
};

/// The state needed for the dashboard page and its JSON endpoint.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The ledger to read customers from.
    pub ledger: Ledger<SQLiteCustomerStore>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: Ledger::from_ref(state),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The dashboard totals for a month.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// The selected month as `YYYY-MM`, or "all".
    pub month: String,
    /// The totals.
    #[serde(flatten)]
    pub stats: DashboardStats,
}

/// Load every customer and the totals for the month in `query`.
fn load_stats(
    state: &DashboardState,
    query: &MonthQuery,
) -> Result<(MonthFilter, DashboardStats, Vec<Customer>), Error> {
    let month = MonthFilter::from_query(query.month.as_deref(), &state.local_timezone)?;
    let range = month.date_range(&state.local_timezone)?;
    let customers = state
        .ledger
        .list_customers()
        .inspect_err(|error| tracing::error!("could not get customers: {error}"))?;

    let stats = dashboard_stats(&customers, range.as_ref());

    Ok((month, stats, customers))
}

/// A route handler that responds with the dashboard totals for `?month=`,
/// the current month when omitted.
pub async fn get_dashboard_stats_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<DashboardResponse>, Error> {
    let (month, stats, _) = load_stats(&state, &query)?;

    Ok(Json(DashboardResponse {
        month: month.to_string(),
        stats,
    }))
}

/// Display a page with the totals for a month and the latest transactions.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let Some(offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_page_response();
    };

    match load_stats(&state, &query) {
        Ok((month, stats, customers)) => {
            dashboard_view(month, &stats, customers, offset).into_response()
        }
        Err(error) => error.into_page_response(),
    }
}

fn month_link(month: MonthFilter) -> String {
    format!("{}?month={month}", endpoints::DASHBOARD_VIEW)
}

fn dashboard_view(
    month: MonthFilter,
    stats: &DashboardStats,
    customers: Vec<Customer>,
    offset: UtcOffset,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let recent = recent_transactions(customers, RECENT_TRANSACTION_LIMIT);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE) {
            div class="w-full lg:max-w-5xl space-y-6" {
                header class="flex justify-between flex-wrap items-end gap-4" {
                    div {
                        h1 class="text-xl font-bold" { "Dashboard" }
                        p id="transaction-count" class="text-sm text-gray-600 dark:text-gray-400" {
                            (stats.total_transactions) " transactions in " (month.label())
                        }
                    }

                    nav aria-label="Month" class="flex items-center gap-4" {
                        @if let Some(previous) = month.previous() {
                            a href=(month_link(previous)) class=(LINK_STYLE) { "Previous" }
                        }

                        h2 id="month-label" class="text-lg font-semibold" { (month.label()) }

                        @if let Some(next) = month.next() {
                            a href=(month_link(next)) class=(LINK_STYLE) { "Next" }
                        }

                        @if month != MonthFilter::All {
                            a href=(month_link(MonthFilter::All)) class=(LINK_STYLE) { "All time" }
                        }
                    }
                }

                (stats_cards_view(stats))

                (recent_transactions_table(&recent, offset))
            }
        }
    };

    base("Dashboard", &content)
}
