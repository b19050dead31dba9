//! Defines the customer store trait.

use crate::{
    Error,
    customer::{Customer, NewCustomer},
    database_id::{CustomerId, TransactionId},
    transaction::PendingTransaction,
};

/// Reads and writes whole customer documents, i.e. a customer together with
/// its ledger.
///
/// The store does not compute balances. Callers run the ledger rules first
/// and hand the results to the store.
pub trait CustomerStore {
    /// Create a new customer, optionally seeded with an opening transaction.
    ///
    /// The customer's balance is the opening transaction's balance snapshot,
    /// or zero without one.
    fn create(
        &self,
        customer: NewCustomer,
        opening: Option<PendingTransaction>,
    ) -> Result<Customer, Error>;

    /// Retrieve a customer and its ledger.
    fn get(&self, id: CustomerId) -> Result<Customer, Error>;

    /// Retrieve every customer and their ledgers, oldest customer first.
    fn get_all(&self) -> Result<Vec<Customer>, Error>;

    /// Append `transaction` to the end of the ledger of `customer_id` and set
    /// the customer's balance to the transaction's balance snapshot.
    ///
    /// Returns the ID given to the transaction.
    fn append_transaction(
        &self,
        customer_id: CustomerId,
        transaction: &PendingTransaction,
    ) -> Result<TransactionId, Error>;

    /// Overwrite the stored document of `customer` with its current state.
    fn save(&self, customer: &Customer) -> Result<(), Error>;

    /// Delete a customer and its ledger.
    fn delete(&self, id: CustomerId) -> Result<(), Error>;

    /// Replace every stored customer with `customers`, keeping their IDs,
    /// balances and snapshots as given.
    fn replace_all(&self, customers: &[Customer]) -> Result<(), Error>;
}
