//! Displays customers and what they owe.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    AppState, Error,
    customer::{
        Customer,
        list_endpoint::{CustomerSearch, filter_customers},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_date,
        rupees_rounded_with_tooltip,
    },
    ledger::Ledger,
    month::ALL_MONTHS,
    navigation::NavBar,
    stores::sqlite::SQLiteCustomerStore,
    timezone::get_local_offset,
};

/// The state needed for the customers page.
#[derive(Debug, Clone)]
pub struct CustomersPageState {
    pub ledger: Ledger<SQLiteCustomerStore>,
    pub local_timezone: String,
}

impl FromRef<AppState> for CustomersPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: Ledger::from_ref(state),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A customer as shown in the table.
#[derive(Debug, PartialEq)]
struct CustomerTableRow {
    name: String,
    phone: String,
    balance: Decimal,
    transaction_count: usize,
    created_on: String,
    transactions_url: String,
}

/// Renders the customers page, optionally filtered by `?search=`.
pub async fn get_customers_page(
    State(state): State<CustomersPageState>,
    Query(query): Query<CustomerSearch>,
) -> Response {
    let offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => {
            return Error::InvalidTimezoneError(state.local_timezone).into_page_response();
        }
    };

    let customers = match state.ledger.list_customers() {
        Ok(customers) => customers,
        Err(error) => {
            tracing::error!("could not get customers: {error}");
            return error.into_page_response();
        }
    };

    let search = query.search.unwrap_or_default();
    let rows: Vec<CustomerTableRow> = filter_customers(customers, Some(&search))
        .into_iter()
        .map(|customer| to_table_row(customer, offset))
        .collect();

    customers_view(&rows, &search).into_response()
}

fn to_table_row(customer: Customer, offset: time::UtcOffset) -> CustomerTableRow {
    CustomerTableRow {
        transactions_url: transactions_url(&customer.name),
        created_on: format_date(customer.created_at.to_offset(offset).date()),
        transaction_count: customer.transactions.len(),
        name: customer.name,
        phone: customer.phone,
        balance: customer.balance,
    }
}

/// The transactions page filtered to one customer across all months.
fn transactions_url(customer_name: &str) -> String {
    match serde_urlencoded::to_string([("customer", customer_name), ("month", ALL_MONTHS)]) {
        Ok(query) => format!("{}?{query}", endpoints::TRANSACTIONS_VIEW),
        Err(error) => {
            tracing::error!("could not encode customer name {customer_name}: {error}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

fn customers_view(customers: &[CustomerTableRow], search: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();
    let total_outstanding: Decimal = customers.iter().map(|customer| customer.balance).sum();

    let table_row = |customer: &CustomerTableRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(customer.transactions_url) class=(LINK_STYLE) { (customer.name) }
                }
                td class=(TABLE_CELL_STYLE) { (customer.phone) }
                td class="px-6 py-4 text-right tabular-nums"
                {
                    (rupees_rounded_with_tooltip(customer.balance))
                }
                td class="px-6 py-4 text-right" { (customer.transaction_count) }
                td class=(TABLE_CELL_STYLE) { (customer.created_on) }
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
                    h1 class="text-xl font-bold" { "Customers" }

                    form method="get" action=(endpoints::CUSTOMERS_VIEW) class="flex gap-2"
                    {
                        input
                            type="search"
                            name="search"
                            value=(search)
                            placeholder="Search by name or phone"
                            class=(FORM_TEXT_INPUT_STYLE);
                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Search" }
                    }
                }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Outstanding: "
                    span id="total-outstanding" class="font-semibold"
                    {
                        (rupees_rounded_with_tooltip(total_outstanding))
                    }
                }

                div class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Phone" }
                                th scope="col" class="px-6 py-3 text-right" { "Balance" }
                                th scope="col" class="px-6 py-3 text-right" { "Transactions" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Customer Since" }
                            }
                        }

                        tbody
                        {
                            @for customer in customers {
                                (table_row(customer))
                            }

                            @if customers.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        @if search.trim().is_empty() {
                                            "No customers yet."
                                        } @else {
                                            "No customers match \"" (search) "\"."
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Customers", &content)
}
