//! Dashboard module
//!
//! Provides the landing page showing the user's total income, total expenses and balance.

mod aggregation;
mod cards;
mod handlers;

pub use aggregation::{Totals, aggregate};
pub use handlers::get_dashboard_page;
