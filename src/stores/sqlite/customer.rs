//! Implements a SQLite backed customer store.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    Error,
    customer::{CUSTOMER_COLUMNS, Customer, NewCustomer, map_customer_row},
    database_id::{CustomerId, TransactionId},
    stores::CustomerStore,
    transaction::{
        PendingTransaction, TRANSACTION_COLUMNS, Transaction, insert_transaction_row,
        map_transaction_row,
    },
};

/// Stores customers and their ledgers in a SQLite database.
///
/// Every write that touches more than one row runs inside a single SQL
/// transaction, so a customer and its ledger are always replaced together.
#[derive(Debug, Clone)]
pub struct SQLiteCustomerStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCustomerStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The tables must already exist, see [initialize](crate::initialize_db).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl CustomerStore for SQLiteCustomerStore {
    /// Create a new customer in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicatePhone] if another customer already has the phone number,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(
        &self,
        customer: NewCustomer,
        opening: Option<PendingTransaction>,
    ) -> Result<Customer, Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        let balance = opening
            .as_ref()
            .map_or(Decimal::ZERO, |transaction| transaction.balance_after);

        let id: CustomerId = tx
            .prepare_cached(
                "INSERT INTO customer (name, phone, balance, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
            )?
            .query_row(
                (
                    customer.name(),
                    customer.phone(),
                    balance.to_string(),
                    customer.created_at(),
                ),
                |row| row.get(0),
            )
            .map_err(|error| map_phone_error(error, customer.phone()))?;

        let mut transactions = Vec::new();

        if let Some(opening) = opening {
            let transaction_id = insert_transaction_row(&tx, None, id, 0, &opening)?;
            transactions.push(opening.into_transaction(transaction_id, id));
        }

        tx.commit()?;

        Ok(Customer {
            id,
            name: customer.name().to_owned(),
            phone: customer.phone().to_owned(),
            balance,
            transactions,
            created_at: customer.created_at(),
        })
    }

    /// Retrieve a customer and its ledger in recording order.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a customer,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: CustomerId) -> Result<Customer, Error> {
        let connection = self.lock()?;

        select_customer(&connection, id)
    }

    /// Retrieve every customer in the order they were created.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an unexpected SQL error.
    fn get_all(&self) -> Result<Vec<Customer>, Error> {
        let connection = self.lock()?;

        select_all_customers(&connection)
    }

    /// Append a transaction to a customer's ledger and store the new balance.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::PersistenceFailure] if the customer row was not updated,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn append_transaction(
        &self,
        customer_id: CustomerId,
        transaction: &PendingTransaction,
    ) -> Result<TransactionId, Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        let rows_affected = tx.execute(
            "UPDATE customer SET balance = ?1 WHERE id = ?2",
            (transaction.balance_after.to_string(), customer_id),
        )?;

        if rows_affected == 0 {
            return Err(Error::PersistenceFailure(format!(
                "the balance of customer {customer_id} was not updated"
            )));
        }

        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM customer_transaction WHERE customer_id = ?1",
            [customer_id],
            |row| row.get(0),
        )?;

        let id = insert_transaction_row(&tx, None, customer_id, position as usize, transaction)?;

        tx.commit()?;

        Ok(id)
    }

    /// Overwrite a customer's details, balance and ledger.
    ///
    /// The ledger is rewritten in the order of `customer.transactions` and
    /// transactions keep their IDs.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::PersistenceFailure] if the customer row was not updated,
    /// - [Error::DuplicatePhone] if the phone number now clashes with another customer,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn save(&self, customer: &Customer) -> Result<(), Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        let rows_affected = tx
            .execute(
                "UPDATE customer SET name = ?1, phone = ?2, balance = ?3 WHERE id = ?4",
                (
                    &customer.name,
                    &customer.phone,
                    customer.balance.to_string(),
                    customer.id,
                ),
            )
            .map_err(|error| map_phone_error(error, &customer.phone))?;

        if rows_affected == 0 {
            return Err(Error::PersistenceFailure(format!(
                "customer {} was not updated",
                customer.id
            )));
        }

        tx.execute(
            "DELETE FROM customer_transaction WHERE customer_id = ?1",
            [customer.id],
        )?;
        insert_ledger(&tx, customer)?;

        tx.commit()?;

        Ok(())
    }

    /// Delete a customer, the foreign key cascade removes its ledger.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a customer,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, id: CustomerId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute("DELETE FROM customer WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Replace the contents of the store with `customers`.
    ///
    /// Nothing is changed if any customer fails to insert.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicatePhone] if two customers share a phone number,
    /// - or [Error::SqlError] if there is some other SQL error, e.g. two
    ///   transactions sharing an ID.
    fn replace_all(&self, customers: &[Customer]) -> Result<(), Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        tx.execute("DELETE FROM customer_transaction", ())?;
        tx.execute("DELETE FROM customer", ())?;

        for customer in customers {
            tx.prepare_cached(
                "INSERT INTO customer (id, name, phone, balance, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?
            .execute((
                customer.id,
                &customer.name,
                &customer.phone,
                customer.balance.to_string(),
                customer.created_at,
            ))
            .map_err(|error| map_phone_error(error, &customer.phone))?;

            insert_ledger(&tx, customer)?;
        }

        tx.commit()?;

        Ok(())
    }
}

fn select_customer(connection: &Connection, id: CustomerId) -> Result<Customer, Error> {
    let mut customer = connection
        .prepare_cached(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = ?1"
        ))?
        .query_row([id], map_customer_row)?;

    customer.transactions = connection
        .prepare_cached(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM customer_transaction
             WHERE customer_id = ?1
             ORDER BY position"
        ))?
        .query_map([id], map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(customer)
}

fn select_all_customers(connection: &Connection) -> Result<Vec<Customer>, Error> {
    let mut customers = connection
        .prepare(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY id"))?
        .query_map([], map_customer_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut ledgers: HashMap<CustomerId, Vec<Transaction>> = HashMap::new();
    let mut statement = connection.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM customer_transaction ORDER BY customer_id, position"
    ))?;

    for transaction in statement.query_map([], map_transaction_row)? {
        let transaction = transaction?;
        ledgers
            .entry(transaction.customer_id)
            .or_default()
            .push(transaction);
    }

    for customer in &mut customers {
        customer.transactions = ledgers.remove(&customer.id).unwrap_or_default();
    }

    Ok(customers)
}

/// Insert the whole ledger of `customer`, keeping transaction IDs and order.
fn insert_ledger(connection: &Connection, customer: &Customer) -> Result<(), Error> {
    for (position, transaction) in customer.transactions.iter().enumerate() {
        insert_transaction_row(
            connection,
            Some(transaction.id),
            customer.id,
            position,
            &PendingTransaction::from(transaction),
        )?;
    }

    Ok(())
}

fn map_phone_error(error: rusqlite::Error, phone: &str) -> Error {
    match Error::from(error) {
        Error::DuplicatePhone(_) => Error::DuplicatePhone(phone.to_owned()),
        error => error,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        Error,
        customer::NewCustomer,
        stores::{CustomerStore, sqlite::SQLiteCustomerStore},
        test_utils::{customer_with, get_test_connection},
        transaction::{PendingTransaction, TransactionType},
    };

    fn get_store() -> SQLiteCustomerStore {
        SQLiteCustomerStore::new(get_test_connection())
    }

    fn new_customer(name: &str, phone: &str) -> NewCustomer {
        NewCustomer::new(name, phone, datetime!(2025-10-01 08:00 UTC)).unwrap()
    }

    fn pending(
        kind: TransactionType,
        amount: Decimal,
        balance_after: Decimal,
    ) -> PendingTransaction {
        PendingTransaction {
            date: datetime!(2025-10-02 10:30 UTC),
            kind,
            amount,
            balance_after,
            description: None,
        }
    }

    #[test]
    fn create_without_opening_balance() {
        let store = get_store();

        let customer = store.create(new_customer("Asha", "98765"), None).unwrap();

        assert_eq!(customer.name, "Asha");
        assert_eq!(customer.phone, "98765");
        assert_eq!(customer.balance, Decimal::ZERO);
        assert!(customer.transactions.is_empty());
        assert_eq!(store.get(customer.id), Ok(customer));
    }

    #[test]
    fn create_with_opening_balance() {
        let store = get_store();
        let opening = pending(TransactionType::CarryForward, dec!(1000), dec!(1000));

        let customer = store
            .create(new_customer("Asha", "98765"), Some(opening))
            .unwrap();

        assert_eq!(customer.balance, dec!(1000));
        assert_eq!(customer.transactions.len(), 1);
        assert_eq!(customer.transactions[0].customer_id, customer.id);
        assert_eq!(store.get(customer.id), Ok(customer));
    }

    #[test]
    fn create_rejects_duplicate_phone() {
        let store = get_store();
        store.create(new_customer("Asha", "98765"), None).unwrap();

        let result = store.create(new_customer("Ravi", "98765"), None);

        assert_eq!(result, Err(Error::DuplicatePhone("98765".to_owned())));
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn get_missing_customer() {
        let store = get_store();

        assert_eq!(store.get(42), Err(Error::NotFound));
    }

    #[test]
    fn append_keeps_recording_order_and_balance() {
        let store = get_store();
        let customer = store.create(new_customer("Asha", "98765"), None).unwrap();

        // The later transaction has the earlier date, order must follow recording.
        let mut late = pending(TransactionType::Credit, dec!(500), dec!(500));
        late.date = datetime!(2025-10-20 10:00 UTC);
        let early = pending(TransactionType::Payment, dec!(200), dec!(300));

        let first_id = store.append_transaction(customer.id, &late).unwrap();
        let second_id = store.append_transaction(customer.id, &early).unwrap();

        let got = store.get(customer.id).unwrap();
        let ids: Vec<_> = got.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, [first_id, second_id]);
        assert_eq!(got.balance, dec!(300));
    }

    #[test]
    fn append_to_missing_customer_fails() {
        let store = get_store();

        let result =
            store.append_transaction(7, &pending(TransactionType::Credit, dec!(1), dec!(1)));

        assert!(matches!(result, Err(Error::PersistenceFailure(_))));
    }

    #[test]
    fn save_rewrites_ledger_with_same_ids() {
        let store = get_store();
        let customer = store.create(new_customer("Asha", "98765"), None).unwrap();
        store
            .append_transaction(
                customer.id,
                &pending(TransactionType::Credit, dec!(100), dec!(100)),
            )
            .unwrap();
        store
            .append_transaction(
                customer.id,
                &pending(TransactionType::Credit, dec!(50), dec!(150)),
            )
            .unwrap();

        let mut customer = store.get(customer.id).unwrap();
        customer.transactions.remove(0);
        customer.balance = dec!(50);
        store.save(&customer).unwrap();

        assert_eq!(store.get(customer.id), Ok(customer));
    }

    #[test]
    fn save_missing_customer_fails() {
        let store = get_store();
        let customer = customer_with(&[(TransactionType::Credit, dec!(10))]);

        let result = store.save(&customer);

        assert!(matches!(result, Err(Error::PersistenceFailure(_))));
    }

    #[test]
    fn delete_removes_customer_and_ledger() {
        let store = get_store();
        let opening = pending(TransactionType::CarryForward, dec!(10), dec!(10));
        let customer = store
            .create(new_customer("Asha", "98765"), Some(opening))
            .unwrap();

        store.delete(customer.id).unwrap();

        assert_eq!(store.get(customer.id), Err(Error::NotFound));
        let connection = store.connection.lock().unwrap();
        let remaining: i64 = connection
            .query_row("SELECT COUNT(*) FROM customer_transaction", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn delete_missing_customer() {
        let store = get_store();

        assert_eq!(store.delete(3), Err(Error::NotFound));
    }

    #[test]
    fn get_all_groups_ledgers_by_customer() {
        let store = get_store();
        let asha = store.create(new_customer("Asha", "1"), None).unwrap();
        let ravi = store.create(new_customer("Ravi", "2"), None).unwrap();
        store
            .append_transaction(ravi.id, &pending(TransactionType::Credit, dec!(5), dec!(5)))
            .unwrap();
        store
            .append_transaction(asha.id, &pending(TransactionType::Cash, dec!(9), dec!(0)))
            .unwrap();

        let customers = store.get_all().unwrap();

        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].name, "Asha");
        assert_eq!(customers[0].transactions.len(), 1);
        assert_eq!(customers[0].transactions[0].kind, TransactionType::Cash);
        assert_eq!(customers[1].name, "Ravi");
        assert_eq!(customers[1].balance, dec!(5));
        assert_eq!(customers[1].transactions[0].kind, TransactionType::Credit);
    }

    #[test]
    fn replace_all_overwrites_store() {
        let store = get_store();
        store.create(new_customer("Old", "0"), None).unwrap();
        let mut restored = customer_with(&[
            (TransactionType::CarryForward, dec!(300)),
            (TransactionType::Payment, dec!(100)),
        ]);
        restored.id = 12;
        for transaction in &mut restored.transactions {
            transaction.customer_id = 12;
        }

        store.replace_all(std::slice::from_ref(&restored)).unwrap();

        assert_eq!(store.get_all(), Ok(vec![restored]));
    }

    #[test]
    fn replace_all_is_atomic() {
        let store = get_store();
        let existing = store.create(new_customer("Old", "0"), None).unwrap();
        let mut first = customer_with(&[]);
        first.id = 1;
        let mut second = customer_with(&[]);
        second.id = 2;

        let result = store.replace_all(&[first, second]);

        assert_eq!(
            result,
            Err(Error::DuplicatePhone("9876543210".to_owned()))
        );
        assert_eq!(store.get_all(), Ok(vec![existing]));
    }
}
