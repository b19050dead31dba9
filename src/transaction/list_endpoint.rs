//! Defines the endpoint for listing the transactions of every customer.

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use serde::Serialize;

use crate::{
    AppState, Error,
    ledger::Ledger,
    pagination::{PaginationConfig, paginate},
    stores::sqlite::SQLiteCustomerStore,
    transaction::listing::{
        Listing, ListingFilter, ListingQuery, TransactionRow, list_transactions,
    },
};

/// The state needed to list, export and display transactions.
#[derive(Debug, Clone)]
pub struct ListingState {
    /// The ledger to read customers from.
    pub ledger: Ledger<SQLiteCustomerStore>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: Ledger::from_ref(state),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

impl ListingState {
    /// Resolve `query` and select the matching transactions.
    pub(crate) fn load(&self, query: &ListingQuery) -> Result<(ListingFilter, Listing), Error> {
        let filter = ListingFilter::from_query(query, &self.local_timezone)?;
        let customers = self
            .ledger
            .list_customers()
            .inspect_err(|error| tracing::error!("could not get customers: {error}"))?;

        let listing = list_transactions(customers, &filter);

        Ok((filter, listing))
    }
}

/// One page of the transaction listing.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    /// The transactions on the page.
    pub transactions: Vec<TransactionRow>,
    /// The selected month as `YYYY-MM`, or "all".
    pub month: String,
    /// How many transactions the month holds for the selected customer, of any type.
    pub month_count: usize,
    /// How many transactions matched every filter.
    pub filtered_count: usize,
    /// The 1-based page number.
    pub page: u64,
    /// How many pages the filtered transactions span.
    pub page_count: u64,
    /// The maximum number of transactions per page.
    pub page_size: u64,
}

/// A route handler that responds with a page of transactions from every
/// customer, filtered and sorted by the query parameters.
pub async fn list_transactions_endpoint(
    State(state): State<ListingState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingResponse>, Error> {
    let (filter, listing) = state.load(&query)?;

    let page_size = state.pagination_config.default_page_size;
    let filtered_count = listing.rows.len();
    let page = paginate(
        listing.rows,
        query.page.unwrap_or(state.pagination_config.default_page),
        page_size,
    );

    Ok(Json(ListingResponse {
        transactions: page.items,
        month: filter.month.to_string(),
        month_count: listing.month_count,
        filtered_count,
        page: page.page,
        page_count: page.page_count,
        page_size,
    }))
}
