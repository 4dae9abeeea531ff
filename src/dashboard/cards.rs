//! Card components for the dashboard totals.

use maud::{Markup, html};

use crate::{dashboard::aggregation::Totals, html::format_currency};

/// Renders one card per total, with the balance spanning the full width.
pub(super) fn totals_cards_view(totals: &Totals) -> Markup {
    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-2 gap-4" aria-label="Totals"
        {
            (total_card("Total income", totals.total_gains, "total-gains", "text-green-700 dark:text-green-400"))
            (total_card("Total expenses", totals.total_expenses, "total-expenses", "text-red-700 dark:text-red-400"))

            div class="sm:col-span-2"
            {
                (total_card("Current balance", totals.current_balance, "current-balance", balance_style(totals.current_balance)))
            }
        }
    }
}

fn balance_style(balance: f64) -> &'static str {
    if balance < 0.0 {
        "text-red-700 dark:text-red-400"
    } else {
        "text-gray-900 dark:text-white"
    }
}

fn total_card(title: &str, amount: f64, id: &str, amount_style: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p id=(id) class={ "mt-2 text-2xl font-semibold " (amount_style) }
            {
                (format_currency(amount))
            }
        }
    }
}
