//! The balance rules for a customer's ledger.
//!
//! A customer's outstanding balance is the fold of their transactions in the
//! order they were recorded:
//! - credit adds the amount,
//! - payment subtracts the amount,
//! - cash leaves the balance alone,
//! - carry-forward replaces the balance with the amount.
//!
//! New transactions are applied to the stored balance in constant time.
//! Edits and deletions refold the whole ledger from zero. Refolding only
//! refreshes the customer's balance, the `balance_after` snapshot of each
//! remaining transaction keeps the value it was recorded with.

use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    customer::Customer,
    database_id::TransactionId,
    transaction::{
        PendingTransaction, Transaction, TransactionInput, TransactionPatch, TransactionType,
    },
};

/// The balance after applying one transaction of `kind` and `amount` to `balance`.
pub fn apply(balance: Decimal, kind: TransactionType, amount: Decimal) -> Decimal {
    match kind {
        TransactionType::Credit => balance + amount,
        TransactionType::Payment => balance - amount,
        TransactionType::Cash => balance,
        TransactionType::CarryForward => amount,
    }
}

/// Replay `transactions` in list order starting from a zero balance.
pub fn fold(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .fold(Decimal::ZERO, |balance, transaction| {
            apply(balance, transaction.kind, transaction.amount)
        })
}

/// Validate `input` and compute its balance snapshot on top of `balance`.
///
/// "deposit" is stored as a payment, blank descriptions are dropped and a
/// missing date defaults to `now`.
///
/// # Errors
/// Returns:
/// - [Error::InvalidTransactionType] if the type is not recognised,
/// - or [Error::InvalidInput] if the amount is negative.
pub fn prepare_transaction(
    balance: Decimal,
    input: &TransactionInput,
    now: OffsetDateTime,
) -> Result<PendingTransaction, Error> {
    let kind: TransactionType = input.kind.parse()?;
    check_amount(input.amount)?;

    Ok(PendingTransaction {
        date: input.date.unwrap_or(now),
        kind,
        amount: input.amount,
        balance_after: apply(balance, kind, input.amount),
        description: clean_description(input.description.as_deref()),
    })
}

/// Record a new transaction at the end of the customer's ledger.
///
/// The new balance is computed from the customer's current balance without
/// refolding, which relies on that balance already matching the ledger.
/// `assign_id` persists the pending transaction and returns its ID. The
/// customer is only changed once `assign_id` has succeeded, so a failed
/// validation or write leaves it untouched.
///
/// # Errors
/// Returns the errors of [prepare_transaction] or whatever `assign_id` returns.
pub fn apply_new_transaction<F>(
    customer: &mut Customer,
    input: &TransactionInput,
    now: OffsetDateTime,
    assign_id: F,
) -> Result<Transaction, Error>
where
    F: FnOnce(&PendingTransaction) -> Result<TransactionId, Error>,
{
    let pending = prepare_transaction(customer.balance, input, now)?;
    let id = assign_id(&pending)?;
    let transaction = pending.into_transaction(id, customer.id);

    customer.balance = transaction.balance_after;
    customer.transactions.push(transaction.clone());

    Ok(transaction)
}

/// Remove the transaction with `transaction_id` and refold the balance.
///
/// Returns the removed transaction, or `None` without changing the customer
/// if the ledger has no such transaction.
pub fn remove_transaction(
    customer: &mut Customer,
    transaction_id: TransactionId,
) -> Option<Transaction> {
    let index = customer
        .transactions
        .iter()
        .position(|transaction| transaction.id == transaction_id)?;

    let removed = customer.transactions.remove(index);
    customer.balance = fold(&customer.transactions);

    Some(removed)
}

/// Overwrite the editable fields of the transaction with `transaction_id` and
/// refold the balance.
///
/// Returns `Ok(false)` without changing the customer if the ledger has no
/// such transaction.
///
/// # Errors
/// Returns [Error::InvalidInput] if the new amount is negative. The patch is
/// checked before anything is changed.
pub fn update_transaction(
    customer: &mut Customer,
    transaction_id: TransactionId,
    patch: &TransactionPatch,
) -> Result<bool, Error> {
    if let Some(amount) = patch.amount {
        check_amount(amount)?;
    }

    let Some(transaction) = customer
        .transactions
        .iter_mut()
        .find(|transaction| transaction.id == transaction_id)
    else {
        return Ok(false);
    };

    if let Some(amount) = patch.amount {
        transaction.amount = amount;
    }

    if let Some(description) = &patch.description {
        transaction.description = clean_description(Some(description));
    }

    if let Some(date) = patch.date {
        transaction.date = date;
    }

    customer.balance = fold(&customer.transactions);

    Ok(true)
}

fn check_amount(amount: Decimal) -> Result<(), Error> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidInput(format!(
            "amount must not be negative, got {amount}"
        )));
    }

    Ok(())
}

fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|description| !description.is_empty())
        .map(str::to_owned)
}
