//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page showing the balance.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing the user's expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The fragment with the list of expenses, loaded by the expenses page.
pub const EXPENSES_LIST: &str = "/expenses/list";
/// The page for creating a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page listing the user's income.
pub const INCOMES_VIEW: &str = "/incomes";
/// The fragment with the list of income, loaded by the income page.
pub const INCOMES_LIST: &str = "/incomes/list";
/// The page for creating a new income.
pub const NEW_INCOME_VIEW: &str = "/incomes/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}', '{transaction_id}' is the
/// parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
