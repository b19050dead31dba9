//! Transactions recorded in customer ledgers.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, the request bodies and the database schema
//! - The endpoints for recording, editing and deleting transactions
//! - The listing of every customer's transactions, its CSV export and its page

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export_endpoint;
mod list_endpoint;
mod listing;
mod transactions_page;

pub use core::{
    PendingTransaction, TRANSACTION_COLUMNS, Transaction, TransactionInput, TransactionPatch,
    TransactionType, create_transaction_table, map_transaction_row,
};
pub(crate) use core::insert_transaction_row;
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use export_endpoint::export_transactions_endpoint;
pub use list_endpoint::{ListingResponse, ListingState, list_transactions_endpoint};
pub use listing::{
    ALL_TYPES, Listing, ListingFilter, ListingQuery, SortField, SortOrder, TransactionRow,
    customer_names, list_transactions,
};
pub use transactions_page::get_transactions_page;
