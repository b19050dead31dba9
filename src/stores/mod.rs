//! Contains traits and implementations for objects that store the domain models.

mod customer;

pub mod sqlite;

pub use customer::CustomerStore;
