//! The recent transactions table on the dashboard.

use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    endpoints,
    html::{
        LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TYPE_BADGE_STYLE,
        format_date, rupees_rounded_with_tooltip,
    },
    transaction::TransactionRow,
};

/// Renders the newest transactions across every customer.
pub(super) fn recent_transactions_table(rows: &[TransactionRow], offset: UtcOffset) -> Markup {
    html! {
        section class="w-full mt-8" {
            div class="flex justify-between items-baseline mb-4" {
                h3 class="text-xl font-semibold" { "Recent Transactions" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
            }

            div class="overflow-x-auto" {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        }
                    }

                    tbody {
                        @for row in rows {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) {
                                    (format_date(row.transaction.date.to_offset(offset).date()))
                                }
                                td class=(TABLE_CELL_STYLE) { (row.customer_name) }
                                td class=(TABLE_CELL_STYLE) {
                                    span class=(TYPE_BADGE_STYLE) { (row.transaction.kind) }
                                }
                                td class="px-6 py-4 text-right tabular-nums" {
                                    (rupees_rounded_with_tooltip(row.transaction.amount))
                                }
                            }
                        }

                        @if rows.is_empty() {
                            tr {
                                td colspan="4" class="px-6 py-4 text-center" {
                                    "No transactions yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
