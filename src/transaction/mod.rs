//! Expenses and income.
//!
//! This module contains everything related to transactions:
//! - The [Transaction] model and how it is stored as a document
//! - Functions for reading and writing transactions in the document store
//! - The list, create and edit pages, and the endpoints behind them

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod list_page;
mod repository;

pub use core::{Timestamp, Transaction, TransactionId, TransactionKind};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::{get_new_expense_page, get_new_income_page};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use list_page::{get_expenses_list, get_expenses_page, get_incomes_list, get_incomes_page};
pub use repository::{
    create_transaction, delete_transaction, fetch_transaction, fetch_transactions_by_kind,
    fetch_transactions_for_user, write_transaction,
};
