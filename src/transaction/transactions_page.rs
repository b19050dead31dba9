//! Displays the transactions of every customer for a month.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TYPE_BADGE_STYLE, base, format_date, rupees_rounded_with_tooltip,
    },
    month::MonthFilter,
    navigation::NavBar,
    pagination::{Page, create_pagination_indicators, paginate, pagination_view},
    timezone::get_local_offset,
    transaction::{
        TransactionType,
        list_endpoint::ListingState,
        listing::{
            ALL_TYPES, ListingFilter, ListingQuery, SortField, SortOrder, TransactionRow,
            customer_names, list_transactions,
        },
    },
};

/// Render the transactions page for the filters in the query string.
pub async fn get_transactions_page(
    State(state): State<ListingState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    match render_transactions_page(&state, &query) {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_page_response(),
    }
}

fn render_transactions_page(state: &ListingState, query: &ListingQuery) -> Result<Markup, Error> {
    let Some(offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone.clone()));
    };

    let filter = ListingFilter::from_query(query, &state.local_timezone)?;
    let customers = state
        .ledger
        .list_customers()
        .inspect_err(|error| tracing::error!("could not get customers: {error}"))?;
    let names = customer_names(&customers);
    let listing = list_transactions(customers, &filter);

    let filtered_count = listing.rows.len();
    let page = paginate(
        listing.rows,
        query.page.unwrap_or(state.pagination_config.default_page),
        state.pagination_config.default_page_size,
    );

    Ok(transactions_view(TransactionsView {
        filter: &filter,
        customer_names: &names,
        month_count: listing.month_count,
        filtered_count,
        page,
        max_pages: state.pagination_config.max_pages,
        offset,
    }))
}

struct TransactionsView<'a> {
    filter: &'a ListingFilter,
    customer_names: &'a [String],
    month_count: usize,
    filtered_count: usize,
    page: Page<TransactionRow>,
    max_pages: u64,
    offset: UtcOffset,
}

/// Build a link to `route` with the current filters, replacing the pairs in `overrides`.
fn filter_url(route: &str, filter: &ListingFilter, overrides: &[(&'static str, String)]) -> String {
    let mut pairs = filter.query_pairs();

    for (key, value) in overrides {
        match pairs.iter_mut().find(|(existing, _)| existing == key) {
            Some(pair) => pair.1 = value.clone(),
            None => pairs.push((*key, value.clone())),
        }
    }

    match serde_urlencoded::to_string(&pairs) {
        Ok(query) => format!("{route}?{query}"),
        Err(error) => {
            tracing::error!("could not encode query {pairs:?}: {error}");
            route.to_owned()
        }
    }
}

/// Clicking the current sort column flips the order, any other column sorts descending.
fn sort_url(filter: &ListingFilter, field: SortField) -> String {
    let order = if filter.sort == field && filter.order == SortOrder::Desc {
        SortOrder::Asc
    } else {
        SortOrder::Desc
    };

    filter_url(
        endpoints::TRANSACTIONS_VIEW,
        filter,
        &[
            ("sort", field.as_str().to_owned()),
            ("order", order.as_str().to_owned()),
        ],
    )
}

fn month_url(filter: &ListingFilter, month: MonthFilter) -> String {
    filter_url(
        endpoints::TRANSACTIONS_VIEW,
        filter,
        &[("month", month.to_string())],
    )
}

fn transactions_view(view: TransactionsView<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let filter = view.filter;
    let is_filtered = filter.kind.is_some() || filter.customer_name.is_some();
    let export_url = filter_url(endpoints::TRANSACTIONS_EXPORT, filter, &[]);
    let indicators =
        create_pagination_indicators(view.page.page, view.page.page_count, view.max_pages);

    let sort_header = |field: SortField, title: &str| {
        let arrow = match (filter.sort == field, filter.order) {
            (false, _) => "",
            (true, SortOrder::Asc) => " ▲",
            (true, SortOrder::Desc) => " ▼",
        };

        html!(
            th scope="col" class=(TABLE_CELL_STYLE)
            {
                a href=(sort_url(filter, field)) { (title) (arrow) }
            }
        )
    };

    let table_row = |row: &TransactionRow| {
        let transaction = &row.transaction;

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (format_date(transaction.date.to_offset(view.offset).date()))
                }
                td class=(TABLE_CELL_STYLE) { (row.customer_name) }
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(TYPE_BADGE_STYLE) { (transaction.kind) }
                }
                td class="px-6 py-4 text-right tabular-nums"
                {
                    (rupees_rounded_with_tooltip(transaction.amount))
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (transaction.description.as_deref().unwrap_or_default())
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Transactions" }
                        p id="record-counts" class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (view.month_count) " total records"
                            @if is_filtered {
                                " • " (view.filtered_count) " filtered records"
                            }
                        }
                    }

                    a href=(export_url) class=(LINK_STYLE) { "Export CSV" }
                }

                nav aria-label="Month" class="flex items-center gap-4"
                {
                    @if let Some(previous) = filter.month.previous() {
                        a href=(month_url(filter, previous)) class=(LINK_STYLE) { "Previous" }
                    }

                    h2 id="month-label" class="text-lg font-semibold" { (filter.month.label()) }

                    @if let Some(next) = filter.month.next() {
                        a href=(month_url(filter, next)) class=(LINK_STYLE) { "Next" }
                    }

                    @if filter.month != MonthFilter::All {
                        a href=(month_url(filter, MonthFilter::All)) class=(LINK_STYLE) { "All time" }
                    }
                }

                form
                    method="get"
                    action=(endpoints::TRANSACTIONS_VIEW)
                    class="flex flex-wrap items-end gap-4"
                {
                    input type="hidden" name="month" value=(filter.month.to_string());

                    div
                    {
                        label for="customer" class=(FORM_LABEL_STYLE) { "Customer" }
                        select id="customer" name="customer" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="" { "All Customers" }
                            @for name in view.customer_names {
                                option
                                    value=(name)
                                    selected[filter.customer_name.as_ref() == Some(name)]
                                { (name) }
                            }
                        }
                    }

                    div
                    {
                        label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                        select id="type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value=(ALL_TYPES) selected[filter.kind.is_none()] { "All Types" }
                            @for kind in TransactionType::ALL {
                                option value=(kind) selected[filter.kind == Some(kind)] { (kind) }
                            }
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
                }

                div class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                (sort_header(SortField::Date, "Date"))
                                (sort_header(SortField::CustomerName, "Customer"))
                                (sort_header(SortField::Type, "Type"))
                                (sort_header(SortField::Amount, "Amount"))
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            }
                        }

                        tbody
                        {
                            @for row in &view.page.items {
                                (table_row(row))
                            }

                            @if view.page.items.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions found."
                                    }
                                }
                            }
                        }
                    }
                }

                @if view.page.page_count > 1 {
                    (pagination_view(&indicators, |page| {
                        filter_url(
                            endpoints::TRANSACTIONS_VIEW,
                            filter,
                            &[("page", page.to_string())],
                        )
                    }))
                }
            }
        }
    );

    base("Transactions", &content)
}
