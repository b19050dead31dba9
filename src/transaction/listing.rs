//! Flattens every customer's ledger into one filtered and sorted list of
//! transactions, shared by the listing endpoint, the CSV export and the
//! transactions page.

use std::{cmp::Ordering, ops::Range};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    customer::Customer,
    month::MonthFilter,
    transaction::{Transaction, TransactionType},
};

/// The query string value that turns the type filter off.
pub const ALL_TYPES: &str = "all";

/// A transaction together with the name of the customer whose ledger holds it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    /// The transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The name of the customer that owns the transaction.
    pub customer_name: String,
}

/// The column to sort the listing by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// When the transaction happened.
    #[default]
    Date,
    /// The owning customer's name, ignoring case.
    #[serde(alias = "customerName")]
    CustomerName,
    /// The transaction type by name.
    Type,
    /// The transaction amount.
    Amount,
}

impl SortField {
    fn compare(&self, a: &TransactionRow, b: &TransactionRow) -> Ordering {
        match self {
            SortField::Date => a.transaction.date.cmp(&b.transaction.date),
            SortField::CustomerName => a
                .customer_name
                .to_lowercase()
                .cmp(&b.customer_name.to_lowercase()),
            SortField::Type => a
                .transaction
                .kind
                .as_str()
                .cmp(b.transaction.kind.as_str()),
            SortField::Amount => a.transaction.amount.cmp(&b.transaction.amount),
        }
    }

    /// The name used for the field in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::CustomerName => "customer_name",
            SortField::Type => "type",
            SortField::Amount => "amount",
        }
    }
}

/// The direction to sort the listing in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// The name used for the order in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// The query parameters accepted by the listing, the export and the transactions page.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListingQuery {
    /// A month as `YYYY-MM` or "all", defaults to the current month.
    pub month: Option<String>,
    /// The exact name of a customer.
    pub customer: Option<String>,
    /// "all" or a transaction type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The column to sort by, defaults to the date.
    pub sort: Option<SortField>,
    /// The sort direction, defaults to descending.
    pub order: Option<SortOrder>,
    /// The 1-based page number.
    pub page: Option<u64>,
}

/// A resolved [ListingQuery].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    /// The selected month.
    pub month: MonthFilter,
    /// The instants covered by `month`, `None` for all time.
    pub range: Option<Range<OffsetDateTime>>,
    /// Only keep the transactions of the customer with exactly this name.
    pub customer_name: Option<String>,
    /// `None` keeps every type.
    pub kind: Option<TransactionType>,
    /// The column to sort by.
    pub sort: SortField,
    /// The sort direction.
    pub order: SortOrder,
}

impl ListingFilter {
    /// Resolve `query` against the local timezone.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidMonth] if the month cannot be parsed,
    /// - [Error::InvalidTransactionType] if the type is neither "all" nor a transaction type,
    /// - or [Error::InvalidTimezoneError] if the timezone is not a canonical timezone name.
    pub fn from_query(query: &ListingQuery, canonical_timezone: &str) -> Result<Self, Error> {
        let month = MonthFilter::from_query(query.month.as_deref(), canonical_timezone)?;
        let range = month.date_range(canonical_timezone)?;

        let kind = match query.kind.as_deref().map(str::trim) {
            None | Some("") | Some(ALL_TYPES) => None,
            Some(kind) => Some(kind.parse()?),
        };

        let customer_name = query
            .customer
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        Ok(Self {
            month,
            range,
            customer_name,
            kind,
            sort: query.sort.unwrap_or_default(),
            order: query.order.unwrap_or_default(),
        })
    }

    /// The filter as query string pairs, e.g. for the links between pages.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("month", self.month.to_string())];

        if let Some(customer_name) = &self.customer_name {
            pairs.push(("customer", customer_name.clone()));
        }

        pairs.push((
            "type",
            self.kind
                .map_or_else(|| ALL_TYPES.to_owned(), |kind| kind.to_string()),
        ));
        pairs.push(("sort", self.sort.as_str().to_owned()));
        pairs.push(("order", self.order.as_str().to_owned()));

        pairs
    }

    fn in_range(&self, date: OffsetDateTime) -> bool {
        self.range
            .as_ref()
            .is_none_or(|range| range.contains(&date))
    }

    fn matches_customer(&self, name: &str) -> bool {
        self.customer_name
            .as_deref()
            .is_none_or(|customer_name| customer_name == name)
    }
}

/// The rows selected by a [ListingFilter].
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// The filtered and sorted rows.
    pub rows: Vec<TransactionRow>,
    /// How many transactions fall in the month for the selected customer,
    /// before filtering by type.
    pub month_count: usize,
}

/// Flatten the ledgers of `customers`, then filter and sort them by `filter`.
///
/// The sort is stable, so rows that compare equal keep the order of
/// `customers` and their ledgers.
pub fn list_transactions(customers: Vec<Customer>, filter: &ListingFilter) -> Listing {
    let in_month: Vec<TransactionRow> = customers
        .into_iter()
        .filter(|customer| filter.matches_customer(&customer.name))
        .flat_map(|customer| {
            let customer_name = customer.name;

            customer
                .transactions
                .into_iter()
                .map(move |transaction| TransactionRow {
                    transaction,
                    customer_name: customer_name.clone(),
                })
        })
        .filter(|row| filter.in_range(row.transaction.date))
        .collect();

    let month_count = in_month.len();

    let mut rows: Vec<TransactionRow> = in_month
        .into_iter()
        .filter(|row| filter.kind.is_none_or(|kind| row.transaction.kind == kind))
        .collect();

    rows.sort_by(|a, b| {
        let ordering = filter.sort.compare(a, b);

        match filter.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    Listing { rows, month_count }
}

/// The distinct customer names, sorted, for picking a customer to filter by.
pub fn customer_names(customers: &[Customer]) -> Vec<String> {
    let mut names: Vec<String> = customers
        .iter()
        .map(|customer| customer.name.clone())
        .collect();
    names.sort();
    names.dedup();

    names
}
