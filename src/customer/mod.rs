//! Customers, their ledgers and the endpoints for managing them.

mod core;
mod create_endpoint;
mod customers_page;
mod delete_endpoint;
mod list_endpoint;

pub use core::{
    CUSTOMER_COLUMNS, Customer, CustomerForm, NewCustomer, create_customer_table,
    map_customer_row,
};
pub use create_endpoint::create_customer_endpoint;
pub use customers_page::get_customers_page;
pub use delete_endpoint::delete_customer_endpoint;
pub use list_endpoint::{CustomerSearch, get_customer_endpoint, list_customers_endpoint};
