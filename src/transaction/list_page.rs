//! The pages listing a user's expenses or income.
//!
//! The page itself is rendered in the loading state, and the list is loaded by HTMX
//! from a separate fragment endpoint. The fragment is also what the delete endpoint
//! responds with, so deleting a transaction refreshes the list.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time_tz::Tz;

use crate::{
    AppState, Error,
    date::format_timestamp_as_date,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base, error_banner, format_currency, loading_spinner,
    },
    navigation::NavBar,
    screen::{Screen, ScreenState},
    store::SharedStore,
    timezone::require_timezone,
    transaction::{Transaction, TransactionKind, fetch_transactions_by_kind},
    user::CurrentUser,
};

/// The element ID of the list fragment, used as the HTMX swap target.
pub const TRANSACTION_LIST_ID: &str = "transaction-list";

/// The two kinds of transaction that have a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionList {
    Expenses,
    Incomes,
}

impl TransactionList {
    /// The list that shows transactions of `kind`, if any.
    pub fn for_kind(kind: &TransactionKind) -> Option<Self> {
        match kind {
            TransactionKind::Expense => Some(Self::Expenses),
            TransactionKind::Income => Some(Self::Incomes),
            TransactionKind::Other(_) => None,
        }
    }

    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Expenses => TransactionKind::Expense,
            Self::Incomes => TransactionKind::Income,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Expenses => "Expenses",
            Self::Incomes => "Incomes",
        }
    }

    fn page_endpoint(self) -> &'static str {
        match self {
            Self::Expenses => endpoints::EXPENSES_VIEW,
            Self::Incomes => endpoints::INCOMES_VIEW,
        }
    }

    fn list_endpoint(self) -> &'static str {
        match self {
            Self::Expenses => endpoints::EXPENSES_LIST,
            Self::Incomes => endpoints::INCOMES_LIST,
        }
    }

    fn new_endpoint(self) -> &'static str {
        match self {
            Self::Expenses => endpoints::NEW_EXPENSE_VIEW,
            Self::Incomes => endpoints::NEW_INCOME_VIEW,
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            Self::Expenses => "No expenses found.",
            Self::Incomes => "No income found.",
        }
    }
}

/// The state needed to load a transaction list.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    pub store: SharedStore,
    pub current_user: CurrentUser,
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            current_user: state.current_user.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The search query for a list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

impl ListQuery {
    fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or_default()
    }
}

pub async fn get_expenses_page(Query(query): Query<ListQuery>) -> Response {
    list_page_view(TransactionList::Expenses, query.search()).into_response()
}

pub async fn get_incomes_page(Query(query): Query<ListQuery>) -> Response {
    list_page_view(TransactionList::Incomes, query.search()).into_response()
}

pub async fn get_expenses_list(
    State(state): State<TransactionListState>,
    Query(query): Query<ListQuery>,
) -> Response {
    get_list(TransactionList::Expenses, &state, query.search()).await
}

pub async fn get_incomes_list(
    State(state): State<TransactionListState>,
    Query(query): Query<ListQuery>,
) -> Response {
    get_list(TransactionList::Incomes, &state, query.search()).await
}

async fn get_list(list: TransactionList, state: &TransactionListState, search: &str) -> Response {
    render_list(list, state, search)
        .await
        .map(IntoResponse::into_response)
        .unwrap_or_else(Error::into_alert_response)
}

/// Fetch the list and render it, including fetch failures as an error banner.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the dates cannot be displayed in the local timezone.
pub async fn render_list(
    list: TransactionList,
    state: &TransactionListState,
    search: &str,
) -> Result<Markup, Error> {
    let timezone = require_timezone(&state.local_timezone)?;

    let screen = Screen::new();
    let store = state.store.clone();
    let user_id = state.current_user.id.clone();
    let screen_state = screen
        .load(async move { fetch_transactions_by_kind(&store, &user_id, list.kind()).await })
        .await;

    let screen_state = match screen_state {
        ScreenState::Ready(transactions) => {
            ScreenState::Ready(filter_by_search(transactions, search))
        }
        other => other,
    };

    Ok(transaction_list_view(list, &screen_state, timezone))
}

/// Keep the transactions whose title or description contains `search`, ignoring case.
fn filter_by_search(transactions: Vec<Transaction>, search: &str) -> Vec<Transaction> {
    if search.is_empty() {
        return transactions;
    }

    let search = search.to_lowercase();

    transactions
        .into_iter()
        .filter(|transaction| {
            transaction.title.to_lowercase().contains(&search)
                || transaction.description.to_lowercase().contains(&search)
        })
        .collect()
}

fn list_page_view(list: TransactionList, search: &str) -> Markup {
    let nav_bar = NavBar::new(list.page_endpoint()).into_html();
    let list_fragment = loading_list_view(list);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-4"
            {
                div class="flex items-center justify-between"
                {
                    h1 class="text-2xl font-bold" { (list.title()) }

                    a href=(list.new_endpoint()) class=(LINK_STYLE)
                    {
                        "Add " (list.kind().label().to_lowercase())
                    }
                }

                input
                    id="search"
                    name="q"
                    type="search"
                    placeholder=(format!("Search {}", list.title().to_lowercase()))
                    value=(search)
                    hx-get=(list.list_endpoint())
                    hx-trigger="input changed delay:300ms, search"
                    hx-target={ "#" (TRANSACTION_LIST_ID) }
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class=(FORM_TEXT_INPUT_STYLE);

                (list_fragment)

                a href=(list.new_endpoint()) class={ "block text-center " (BUTTON_PRIMARY_STYLE) }
                {
                    "Add new " (list.kind().label().to_lowercase())
                }
            }
        }
    };

    base(list.title(), &content)
}

/// The list placeholder, which asks HTMX to fetch the list as soon as it is shown.
fn loading_list_view(list: TransactionList) -> Markup {
    html! {
        div
            id=(TRANSACTION_LIST_ID)
            hx-get=(list.list_endpoint())
            hx-trigger="load"
            hx-include="#search"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full text-center py-8"
        {
            (loading_spinner())
            " Loading..."
        }
    }
}

/// Render the list for the given state, showing dates as they fall in `timezone`.
pub fn transaction_list_view(
    list: TransactionList,
    state: &ScreenState<Vec<Transaction>>,
    timezone: &Tz,
) -> Markup {
    match state {
        ScreenState::Loading => loading_list_view(list),
        ScreenState::Error(message) => html! {
            div id=(TRANSACTION_LIST_ID) class="w-full"
            {
                (error_banner(
                    &format!("Could not load {}", list.title().to_lowercase()),
                    message,
                ))
            }
        },
        ScreenState::Ready(transactions) if transactions.is_empty() => html! {
            div id=(TRANSACTION_LIST_ID) class="w-full"
            {
                p class="py-8 text-center text-gray-500 dark:text-gray-400"
                {
                    (list.empty_message())
                }
            }
        },
        ScreenState::Ready(transactions) => html! {
            div id=(TRANSACTION_LIST_ID) class="w-full overflow-x-auto"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class="text-xs text-gray-700 uppercase bg-gray-50 dark:bg-gray-700 dark:text-gray-400"
                    {
                        tr
                        {
                            th scope="col" class="px-4 py-3" { "Title" }
                            th scope="col" class="px-4 py-3" { "Date" }
                            th scope="col" class="px-4 py-3 text-right" { "Value" }
                            th scope="col" class="px-4 py-3" { span class="sr-only" { "Actions" } }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(list, transaction, timezone))
                        }
                    }
                }
            }
        },
    }
}

fn transaction_row(list: TransactionList, transaction: &Transaction, timezone: &Tz) -> Markup {
    let title = if transaction.title.is_empty() {
        "Untitled"
    } else {
        transaction.title.as_str()
    };
    let date = transaction
        .date
        .and_then(|timestamp| format_timestamp_as_date(timestamp, timezone));

    html! {
        tr class="bg-white border-b dark:bg-gray-800 dark:border-gray-700"
        {
            td class="px-4 py-3"
            {
                p class="font-medium text-gray-900 dark:text-white" { (title) }
                @if !transaction.description.is_empty() {
                    p { (transaction.description) }
                }
            }

            td class="px-4 py-3"
            {
                (date.as_deref().unwrap_or("-"))
            }

            td class="px-4 py-3 text-right"
            {
                (format_currency(transaction.value))
            }

            td class="px-4 py-3 text-right whitespace-nowrap space-x-2"
            {
                @if let Some(id) = &transaction.id {
                    a
                        href=(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, id))
                        class=(LINK_STYLE)
                    {
                        "Edit"
                    }

                    button
                        type="button"
                        hx-delete=(format!(
                            "{}?kind={}",
                            format_endpoint(endpoints::TRANSACTION, id),
                            list.kind().as_str()
                        ))
                        hx-include="#search"
                        hx-confirm={ "Delete \"" (title) "\"?" }
                        hx-target={ "#" (TRANSACTION_LIST_ID) }
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}
