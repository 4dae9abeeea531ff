//! Totals derived from a user's transactions.

use crate::transaction::{Transaction, TransactionKind};

/// The sums shown on the dashboard.
///
/// Nothing here is stored, the totals are recomputed from the transactions on every request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// The sum of the values of all income.
    pub total_gains: f64,
    /// The sum of the values of all expenses.
    pub total_expenses: f64,
    /// `total_gains - total_expenses`.
    pub current_balance: f64,
}

/// Sum income and expenses and compute the balance.
///
/// Transactions of any other kind are ignored. No rounding is applied.
pub fn aggregate(transactions: &[Transaction]) -> Totals {
    let (total_gains, total_expenses) = transactions.iter().fold(
        (0.0, 0.0),
        |(gains, expenses), transaction| match transaction.kind {
            TransactionKind::Income => (gains + transaction.value, expenses),
            TransactionKind::Expense => (gains, expenses + transaction.value),
            TransactionKind::Other(_) => (gains, expenses),
        },
    );

    Totals {
        total_gains,
        total_expenses,
        current_balance: total_gains - total_expenses,
    }
}
