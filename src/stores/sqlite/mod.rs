//! Contains the SQLite backed implementations of the stores.

mod customer;

pub use customer::SQLiteCustomerStore;
