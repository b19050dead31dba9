//! Card components for the dashboard totals.

use maud::{Markup, html};

use crate::{dashboard::stats::DashboardStats, html::rupees_rounded_with_tooltip};

/// A single total with its title.
fn stat_card(id: &str, title: &str, value: Markup) -> Markup {
    html! {
        div
            id=(id)
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p class="mt-2 text-2xl font-semibold tabular-nums" { (value) }
        }
    }
}

/// Renders the grid of totals for the selected month.
pub(super) fn stats_cards_view(stats: &DashboardStats) -> Markup {
    html! {
        section class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4 w-full" {
            (stat_card("total-sales", "Total Sales", rupees_rounded_with_tooltip(stats.total_sales)))
            (stat_card("cash-sales", "Cash Sales", rupees_rounded_with_tooltip(stats.cash_sales)))
            (stat_card("credit-sales", "Credit Sales", rupees_rounded_with_tooltip(stats.credit_sales)))
            (stat_card("total-deposits", "Total Deposits", rupees_rounded_with_tooltip(stats.total_deposits)))
            (stat_card(
                "outstanding-balance",
                "Outstanding Balance",
                rupees_rounded_with_tooltip(stats.outstanding_balance),
            ))
            (stat_card("total-customers", "Total Customers", html!((stats.total_customers))))
        }
    }
}
