//! Sales, deposit and balance totals across every customer.

use std::ops::Range;

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    customer::Customer,
    month::MonthFilter,
    transaction::{
        ListingFilter, SortField, SortOrder, TransactionRow, TransactionType, list_transactions,
    },
};

/// How many transactions the dashboard lists under "Recent Transactions".
pub(super) const RECENT_TRANSACTION_LIMIT: usize = 50;

/// Totals shown on the dashboard.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Cash and credit sales in the range.
    pub total_sales: Decimal,
    /// Cash sales in the range.
    pub cash_sales: Decimal,
    /// Credit sales in the range.
    pub credit_sales: Decimal,
    /// Payments received in the range.
    pub total_deposits: Decimal,
    /// What every customer owes right now.
    pub outstanding_balance: Decimal,
    /// Every customer, regardless of the range.
    pub total_customers: usize,
    /// Transactions of any type in the range.
    pub total_transactions: usize,
}

/// Sum up the transactions of `customers` dated within `range`, or all of
/// them when `range` is `None`.
///
/// The outstanding balance and the customer count ignore the range.
pub fn dashboard_stats(
    customers: &[Customer],
    range: Option<&Range<OffsetDateTime>>,
) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for customer in customers {
        stats.total_customers += 1;
        stats.outstanding_balance += customer.balance;

        let in_range = customer
            .transactions
            .iter()
            .filter(|transaction| range.is_none_or(|range| range.contains(&transaction.date)));

        for transaction in in_range {
            stats.total_transactions += 1;

            match transaction.kind {
                TransactionType::Cash => {
                    stats.cash_sales += transaction.amount;
                    stats.total_sales += transaction.amount;
                }
                TransactionType::Credit => {
                    stats.credit_sales += transaction.amount;
                    stats.total_sales += transaction.amount;
                }
                TransactionType::Payment => stats.total_deposits += transaction.amount,
                TransactionType::CarryForward => {}
            }
        }
    }

    stats
}

/// The newest transactions across every customer, newest first.
pub(super) fn recent_transactions(customers: Vec<Customer>, limit: usize) -> Vec<TransactionRow> {
    let filter = ListingFilter {
        month: MonthFilter::All,
        range: None,
        customer_name: None,
        kind: None,
        sort: SortField::Date,
        order: SortOrder::Desc,
    };

    let mut rows = list_transactions(customers, &filter).rows;
    rows.truncate(limit);

    rows
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::{Duration, macros::datetime};

    use crate::{
        customer::Customer,
        test_utils::{FIRST_DATE, customer_with},
        transaction::TransactionType,
    };

    use super::{DashboardStats, dashboard_stats, recent_transactions};

    fn customers() -> Vec<Customer> {
        let first = customer_with(&[
            (TransactionType::CarryForward, dec!(1000)),
            (TransactionType::Credit, dec!(500)),
            (TransactionType::Cash, dec!(200)),
            (TransactionType::Payment, dec!(300)),
        ]);
        let mut second = customer_with(&[(TransactionType::Credit, dec!(50))]);
        second.id = 2;

        vec![first, second]
    }

    #[test]
    fn sums_every_transaction_without_range() {
        let stats = dashboard_stats(&customers(), None);

        assert_eq!(
            stats,
            DashboardStats {
                total_sales: dec!(750),
                cash_sales: dec!(200),
                credit_sales: dec!(550),
                total_deposits: dec!(300),
                outstanding_balance: dec!(1250),
                total_customers: 2,
                total_transactions: 5,
            }
        );
    }

    #[test]
    fn only_counts_transactions_in_range() {
        // Transactions are an hour apart from FIRST_DATE + 1h, so this keeps the
        // second and third transaction of the first customer.
        let range = FIRST_DATE + Duration::hours(2)..FIRST_DATE + Duration::hours(4);

        let stats = dashboard_stats(&customers(), Some(&range));

        assert_eq!(
            stats,
            DashboardStats {
                total_sales: dec!(700),
                cash_sales: dec!(200),
                credit_sales: dec!(500),
                total_deposits: dec!(0),
                outstanding_balance: dec!(1250),
                total_customers: 2,
                total_transactions: 2,
            }
        );
    }

    #[test]
    fn empty_store_is_all_zero() {
        let range = datetime!(2025-10-01 00:00 UTC)..datetime!(2025-11-01 00:00 UTC);

        assert_eq!(dashboard_stats(&[], Some(&range)), DashboardStats::default());
    }

    #[test]
    fn recent_transactions_are_newest_first_and_limited() {
        let rows = recent_transactions(customers(), 3);

        let amounts: Vec<_> = rows.iter().map(|row| row.transaction.amount).collect();
        assert_eq!(amounts, [dec!(300), dec!(200), dec!(500)]);
    }
}
