//! The customer and transaction operations, each a read-modify-write of one
//! customer document serialized by the customer's lock.

use axum::extract::FromRef;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    customer::{Customer, CustomerForm, NewCustomer},
    database_id::{CustomerId, TransactionId},
    ledger::{
        CustomerLocks,
        engine::{self, apply_new_transaction, prepare_transaction},
    },
    stores::{CustomerStore, sqlite::SQLiteCustomerStore},
    transaction::{TransactionInput, TransactionPatch, TransactionType},
};

/// The description given to the transaction that seeds a new customer's
/// opening balance.
pub const OPENING_BALANCE_DESCRIPTION: &str = "Opening Balance";

/// Runs the ledger rules against customers held in a [CustomerStore].
#[derive(Debug, Clone)]
pub struct Ledger<S> {
    store: S,
    locks: CustomerLocks,
}

impl FromRef<AppState> for Ledger<SQLiteCustomerStore> {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            SQLiteCustomerStore::new(state.db_connection.clone()),
            state.customer_locks.clone(),
        )
    }
}

impl<S> Ledger<S>
where
    S: CustomerStore,
{
    /// Create a ledger over `store`, serializing writes with `locks`.
    pub fn new(store: S, locks: CustomerLocks) -> Self {
        Self { store, locks }
    }

    /// Create a customer, seeding its ledger with a carry-forward of the
    /// initial balance if one is given.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidInput] if the name or phone is blank or the initial balance is negative,
    /// - [Error::DuplicatePhone] if the phone number already belongs to a customer,
    /// - or any error from the store.
    pub async fn create_customer(
        &self,
        form: CustomerForm,
        now: OffsetDateTime,
    ) -> Result<Customer, Error> {
        let customer = NewCustomer::new(&form.name, &form.phone, now)?;

        let opening = form
            .initial_balance
            .map(|amount| {
                let input = TransactionInput {
                    kind: TransactionType::CarryForward.to_string(),
                    amount,
                    description: Some(OPENING_BALANCE_DESCRIPTION.to_owned()),
                    date: form.opening_date,
                };

                prepare_transaction(Decimal::ZERO, &input, now)
            })
            .transpose()?;

        let customer = self.store.create(customer, opening)?;
        tracing::info!("created customer {}", customer.id);

        Ok(customer)
    }

    /// Delete a customer together with its ledger.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such customer, or any error from the store.
    pub async fn delete_customer(&self, customer_id: CustomerId) -> Result<(), Error> {
        let guard = self.locks.lock(customer_id).await;
        self.store.delete(customer_id)?;
        drop(guard);

        self.locks.forget(customer_id);
        tracing::info!("deleted customer {customer_id}");

        Ok(())
    }

    /// Record a new transaction at the end of a customer's ledger.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if there is no such customer,
    /// - [Error::InvalidTransactionType] if the type is not recognised,
    /// - [Error::InvalidInput] if the amount is negative,
    /// - or any error from the store.
    pub async fn add_transaction(
        &self,
        customer_id: CustomerId,
        input: &TransactionInput,
        now: OffsetDateTime,
    ) -> Result<Customer, Error> {
        let _guard = self.locks.lock(customer_id).await;
        let mut customer = self.store.get(customer_id)?;

        apply_new_transaction(&mut customer, input, now, |pending| {
            self.store.append_transaction(customer_id, pending)
        })?;

        Ok(customer)
    }

    /// Edit the amount, description or date of a recorded transaction.
    ///
    /// An unknown `transaction_id` returns the customer unchanged.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if there is no such customer,
    /// - [Error::InvalidInput] if the new amount is negative,
    /// - or any error from the store.
    pub async fn update_transaction(
        &self,
        customer_id: CustomerId,
        transaction_id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Customer, Error> {
        let _guard = self.locks.lock(customer_id).await;
        let mut customer = self.store.get(customer_id)?;

        if engine::update_transaction(&mut customer, transaction_id, patch)? {
            self.store.save(&customer)?;
        } else {
            tracing::debug!(
                "customer {customer_id} has no transaction {transaction_id}, nothing to update"
            );
        }

        Ok(customer)
    }

    /// Delete a recorded transaction.
    ///
    /// An unknown `transaction_id` returns the customer unchanged.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such customer, or any error from the store.
    pub async fn delete_transaction(
        &self,
        customer_id: CustomerId,
        transaction_id: TransactionId,
    ) -> Result<Customer, Error> {
        let _guard = self.locks.lock(customer_id).await;
        let mut customer = self.store.get(customer_id)?;

        if engine::remove_transaction(&mut customer, transaction_id).is_some() {
            self.store.save(&customer)?;
        } else {
            tracing::debug!(
                "customer {customer_id} has no transaction {transaction_id}, nothing to delete"
            );
        }

        Ok(customer)
    }

    /// Every customer with their ledgers, oldest customer first.
    ///
    /// # Errors
    /// Returns any error from the store.
    pub fn list_customers(&self) -> Result<Vec<Customer>, Error> {
        self.store.get_all()
    }

    /// A single customer with its ledger.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such customer, or any error from the store.
    pub fn get_customer(&self, customer_id: CustomerId) -> Result<Customer, Error> {
        self.store.get(customer_id)
    }

    /// Replace every customer in the store with `customers`.
    ///
    /// Waits for writes to any customer to finish, and holds off new ones
    /// until the store has been replaced.
    ///
    /// # Errors
    /// Returns any error from the store, in which case nothing is replaced.
    pub async fn restore(&self, customers: &[Customer]) -> Result<(), Error> {
        let _guard = self.locks.lock_all().await;
        self.store.replace_all(customers)?;
        tracing::info!("restored {} customers from a backup", customers.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        Error,
        customer::{Customer, CustomerForm},
        ledger::{Ledger, engine::fold},
        stores::sqlite::SQLiteCustomerStore,
        test_utils::{get_test_ledger, input},
        transaction::{TransactionPatch, TransactionType},
    };

    use super::OPENING_BALANCE_DESCRIPTION;

    const NOW: time::OffsetDateTime = datetime!(2025-10-05 12:00 UTC);

    fn form(name: &str, phone: &str, initial_balance: Option<Decimal>) -> CustomerForm {
        CustomerForm {
            name: name.to_owned(),
            phone: phone.to_owned(),
            initial_balance,
            opening_date: None,
        }
    }

    async fn create(ledger: &Ledger<SQLiteCustomerStore>) -> Customer {
        ledger
            .create_customer(form("Asha", "9876543210", None), NOW)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn scenario_credit_cash_payment() {
        let ledger = get_test_ledger();
        let customer = create(&ledger).await;

        let customer = ledger
            .add_transaction(customer.id, &input("credit", dec!(500)), NOW)
            .await
            .unwrap();
        assert_eq!(customer.balance, dec!(500));
        assert_eq!(customer.transactions[0].balance_after, dec!(500));

        let customer = ledger
            .add_transaction(customer.id, &input("cash", dec!(200)), NOW)
            .await
            .unwrap();
        assert_eq!(customer.balance, dec!(500));
        assert_eq!(customer.transactions[1].balance_after, dec!(500));

        let customer = ledger
            .add_transaction(customer.id, &input("payment", dec!(300)), NOW)
            .await
            .unwrap();
        assert_eq!(customer.balance, dec!(200));
        assert_eq!(customer.transactions[2].balance_after, dec!(200));

        assert_eq!(ledger.get_customer(customer.id), Ok(customer));
    }

    #[tokio::test]
    async fn scenario_delete_first_credit() {
        let ledger = get_test_ledger();
        let customer = create(&ledger).await;
        ledger
            .add_transaction(customer.id, &input("credit", dec!(100)), NOW)
            .await
            .unwrap();
        let customer = ledger
            .add_transaction(customer.id, &input("credit", dec!(50)), NOW)
            .await
            .unwrap();
        let first_id = customer.transactions[0].id;

        let customer = ledger
            .delete_transaction(customer.id, first_id)
            .await
            .unwrap();

        assert_eq!(customer.balance, dec!(50));
        assert_eq!(customer.transactions.len(), 1);
        // The remaining snapshot keeps the value it was recorded with.
        assert_eq!(customer.transactions[0].balance_after, dec!(150));
        assert_eq!(ledger.get_customer(customer.id), Ok(customer));
    }

    #[tokio::test]
    async fn scenario_opening_balance_then_credit() {
        let ledger = get_test_ledger();
        let customer = ledger
            .create_customer(form("Asha", "9876543210", Some(dec!(1000))), NOW)
            .await
            .unwrap();
        assert_eq!(customer.balance, dec!(1000));
        assert_eq!(customer.transactions[0].kind, TransactionType::CarryForward);
        assert_eq!(
            customer.transactions[0].description.as_deref(),
            Some(OPENING_BALANCE_DESCRIPTION)
        );
        assert_eq!(customer.transactions[0].date, NOW);

        let customer = ledger
            .add_transaction(customer.id, &input("credit", dec!(200)), NOW)
            .await
            .unwrap();

        assert_eq!(customer.balance, dec!(1200));
    }

    #[tokio::test]
    async fn opening_balance_uses_opening_date() {
        let ledger = get_test_ledger();
        let opening_date = datetime!(2025-04-01 00:00 UTC);
        let mut form = form("Asha", "9876543210", Some(dec!(75)));
        form.opening_date = Some(opening_date);

        let customer = ledger.create_customer(form, NOW).await.unwrap();

        assert_eq!(customer.transactions[0].date, opening_date);
        assert_eq!(customer.created_at, NOW);
    }

    #[tokio::test]
    async fn scenario_unknown_type_leaves_customer_unchanged() {
        let ledger = get_test_ledger();
        let customer = ledger
            .create_customer(form("Asha", "9876543210", Some(dec!(40))), NOW)
            .await
            .unwrap();

        let result = ledger
            .add_transaction(customer.id, &input("refund", dec!(10)), NOW)
            .await;

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("refund".to_owned()))
        );
        assert_eq!(ledger.get_customer(customer.id), Ok(customer));
    }

    #[tokio::test]
    async fn create_customer_requires_name_and_phone() {
        let ledger = get_test_ledger();

        let result = ledger.create_customer(form("  ", "123", None), NOW).await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(ledger.list_customers(), Ok(vec![]));
    }

    #[tokio::test]
    async fn create_customer_rejects_duplicate_phone() {
        let ledger = get_test_ledger();
        create(&ledger).await;

        let result = ledger
            .create_customer(form("Ravi", "9876543210", Some(dec!(5))), NOW)
            .await;

        assert_eq!(
            result,
            Err(Error::DuplicatePhone("9876543210".to_owned()))
        );
        assert_eq!(ledger.list_customers().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_customer_is_not_found() {
        let ledger = get_test_ledger();

        assert_eq!(
            ledger
                .add_transaction(9, &input("credit", dec!(1)), NOW)
                .await,
            Err(Error::NotFound)
        );
        assert_eq!(
            ledger
                .update_transaction(9, 1, &TransactionPatch::default())
                .await,
            Err(Error::NotFound)
        );
        assert_eq!(ledger.delete_transaction(9, 1).await, Err(Error::NotFound));
        assert_eq!(ledger.delete_customer(9).await, Err(Error::NotFound));
        assert_eq!(ledger.get_customer(9), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn unknown_transaction_is_a_no_op() {
        let ledger = get_test_ledger();
        let customer = create(&ledger).await;
        let customer = ledger
            .add_transaction(customer.id, &input("credit", dec!(100)), NOW)
            .await
            .unwrap();

        let patch = TransactionPatch {
            amount: Some(dec!(1)),
            ..Default::default()
        };
        let updated = ledger
            .update_transaction(customer.id, 999, &patch)
            .await
            .unwrap();
        let first_delete = ledger.delete_transaction(customer.id, 999).await.unwrap();
        let second_delete = ledger.delete_transaction(customer.id, 999).await.unwrap();

        assert_eq!(updated, customer);
        assert_eq!(first_delete, customer);
        assert_eq!(second_delete, customer);
    }

    #[tokio::test]
    async fn update_refolds_balance_and_persists() {
        let ledger = get_test_ledger();
        let customer = create(&ledger).await;
        ledger
            .add_transaction(customer.id, &input("credit", dec!(100)), NOW)
            .await
            .unwrap();
        let customer = ledger
            .add_transaction(customer.id, &input("payment", dec!(30)), NOW)
            .await
            .unwrap();
        let credit_id = customer.transactions[0].id;

        let patch = TransactionPatch {
            amount: Some(dec!(250)),
            description: Some("corrected".to_owned()),
            date: None,
        };
        let customer = ledger
            .update_transaction(customer.id, credit_id, &patch)
            .await
            .unwrap();

        assert_eq!(customer.balance, dec!(220));
        assert_eq!(customer.balance, fold(&customer.transactions));
        assert_eq!(customer.transactions[0].amount, dec!(250));
        assert_eq!(
            customer.transactions[0].description.as_deref(),
            Some("corrected")
        );
        assert_eq!(customer.transactions[0].customer_id, customer.id);
        assert_eq!(ledger.get_customer(customer.id), Ok(customer));
    }

    #[tokio::test]
    async fn delete_customer_removes_it() {
        let ledger = get_test_ledger();
        let customer = create(&ledger).await;

        ledger.delete_customer(customer.id).await.unwrap();

        assert_eq!(ledger.get_customer(customer.id), Err(Error::NotFound));
        assert_eq!(ledger.list_customers(), Ok(vec![]));
    }

    #[tokio::test]
    async fn concurrent_additions_are_not_lost() {
        let ledger = get_test_ledger();
        let customer_id = create(&ledger).await.id;

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move {
                    ledger
                        .add_transaction(customer_id, &input("credit", dec!(10)), NOW)
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let customer = ledger.get_customer(customer_id).unwrap();
        assert_eq!(customer.transactions.len(), 10);
        assert_eq!(customer.balance, dec!(100));
        assert_eq!(customer.balance, fold(&customer.transactions));
    }

    #[tokio::test]
    async fn restore_waits_for_customer_writes() {
        let ledger = get_test_ledger();
        let customer = create(&ledger).await;
        let guard = ledger.locks.lock(customer.id).await;

        let restore = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.restore(&[]).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!restore.is_finished(), "restore ran while a customer was locked");
        assert_eq!(ledger.list_customers().unwrap().len(), 1);

        drop(guard);
        restore.await.unwrap().unwrap();
        assert_eq!(ledger.list_customers(), Ok(vec![]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn restore_does_not_interleave_with_additions() {
        let ledger = get_test_ledger();
        let customer = create(&ledger).await;
        let backup = ledger
            .add_transaction(customer.id, &input("credit", dec!(100)), NOW)
            .await
            .unwrap();

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let ledger = ledger.clone();
                let customer_id = backup.id;
                tokio::spawn(async move {
                    ledger
                        .add_transaction(customer_id, &input("credit", dec!(10)), NOW)
                        .await
                })
            })
            .collect();
        ledger.restore(std::slice::from_ref(&backup)).await.unwrap();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let customer = ledger.get_customer(backup.id).unwrap();
        assert_eq!(customer.balance, fold(&customer.transactions));
        let last = customer.transactions.last().unwrap();
        assert_eq!(last.balance_after, customer.balance);
    }
}
