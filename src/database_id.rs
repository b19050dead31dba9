//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a customer.
pub type CustomerId = DatabaseId;
/// The ID of a transaction, unique across all customers.
pub type TransactionId = DatabaseId;
