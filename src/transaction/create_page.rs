//! Defines the route handlers for the pages for creating a new expense or income.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::OffsetDateTime;
use time_tz::OffsetDateTimeExt;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    timezone::require_timezone,
    transaction::{
        form::{TransactionFormDefaults, transaction_form_fields},
        list_page::TransactionList,
    },
};

fn create_transaction_view(list: TransactionList, today: &str) -> Markup {
    let kind = list.kind();
    let (active_endpoint, heading) = match list {
        TransactionList::Expenses => (endpoints::NEW_EXPENSE_VIEW, "New Expense"),
        TransactionList::Incomes => (endpoints::NEW_INCOME_VIEW, "New Income"),
    };
    let nav_bar = NavBar::new(active_endpoint).into_html();
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        date: Some(today),
        ..Default::default()
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { (heading) }

                input type="hidden" name="kind" value=(kind.as_str());

                (form_fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (loading_spinner())
                    }
                    " Save " (kind.label())
                }
            }
        }
    };

    base(heading, &content)
}

/// The state needed for the create pages.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Luanda".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating an expense.
pub async fn get_new_expense_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    get_create_page(TransactionList::Expenses, &state)
}

/// Renders the page for creating an income.
pub async fn get_new_income_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    get_create_page(TransactionList::Incomes, &state)
}

fn get_create_page(
    list: TransactionList,
    state: &CreateTransactionPageState,
) -> Result<Response, Error> {
    let timezone = require_timezone(&state.local_timezone)?;
    let today = OffsetDateTime::now_utc().to_timezone(timezone).date();

    Ok(create_transaction_view(list, &today.to_string()).into_response())
}
