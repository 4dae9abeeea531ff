//! HTTP handlers for the dashboard page.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState,
    dashboard::{
        aggregation::{Totals, aggregate},
        cards::totals_cards_view,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, base, error_banner, link},
    navigation::NavBar,
    screen::{Screen, ScreenState},
    store::SharedStore,
    transaction::fetch_transactions_for_user,
    user::CurrentUser,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store holding the user's transactions.
    pub store: SharedStore,
    /// The user to show totals for.
    pub current_user: CurrentUser,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            current_user: state.current_user.clone(),
        }
    }
}

/// The dashboard's view of the fetched transactions.
#[derive(Debug, Clone, PartialEq)]
struct DashboardData {
    totals: Totals,
    transaction_count: usize,
}

/// Display a page with the user's totals and links to the expense and income lists.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Response {
    let screen = Screen::new();
    let store = state.store.clone();
    let user_id = state.current_user.id.clone();
    let screen_state = screen
        .load(async move {
            let transactions = fetch_transactions_for_user(&store, &user_id).await?;

            Ok(DashboardData {
                totals: aggregate(&transactions),
                transaction_count: transactions.len(),
            })
        })
        .await;

    dashboard_view(&state.current_user, &screen_state).into_response()
}

fn dashboard_view(user: &CurrentUser, state: &ScreenState<DashboardData>) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let summary = match state {
        ScreenState::Ready(data) if data.transaction_count == 0 => html! {
            (totals_cards_view(&data.totals))
            (no_data_view())
        },
        ScreenState::Ready(data) => totals_cards_view(&data.totals),
        ScreenState::Error(message) => error_banner("Could not load your totals", message),
        ScreenState::Loading => html! {},
    };

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-6 py-8 mx-auto max-w-screen-md
                space-y-6 text-gray-900 dark:text-white"
        {
            div class="w-full"
            {
                h1 class="text-2xl font-bold" { "Welcome" }
                p id="user-name" class="text-lg text-gray-600 dark:text-gray-400" { (user.name) }
            }

            (summary)

            div class="w-full grid grid-cols-1 sm:grid-cols-2 gap-4"
            {
                a href=(endpoints::EXPENSES_VIEW) class=(BUTTON_SECONDARY_STYLE)
                {
                    "Manage expenses"
                }

                a href=(endpoints::INCOMES_VIEW) class={ "block text-center " (BUTTON_PRIMARY_STYLE) }
                {
                    "Manage income"
                }
            }
        }
    );

    base("Dashboard", &content)
}

fn no_data_view() -> Markup {
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "an expense");
    let new_income_link = link(endpoints::NEW_INCOME_VIEW, "some income");

    html!(
        p class="w-full text-center"
        {
            "Nothing here yet. Your totals will update once you add "
            (new_expense_link) " or " (new_income_link) "."
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::extract::{FromRef, State};
    use scraper::{Html, Selector};

    use crate::{
        CurrentUser,
        dashboard::handlers::{DashboardState, get_dashboard_page},
        test_utils::{
            TEST_USER_ID, assert_status_ok, assert_valid_html, get_test_state,
            parse_html_document,
        },
        transaction::{Transaction, TransactionKind, write_transaction},
    };

    #[track_caller]
    fn must_get_text(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element matching {selector}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn shows_totals() {
        let (_, state) = get_test_state();
        let transactions = [
            ("1", TEST_USER_ID, TransactionKind::Income, 100.0),
            ("2", TEST_USER_ID, TransactionKind::Expense, 40.0),
            ("3", TEST_USER_ID, TransactionKind::Income, 25.5),
            ("4", "someone-else", TransactionKind::Income, 1000.0),
        ];
        for (id, owner, kind, value) in transactions {
            write_transaction(&state.store, id, &Transaction::build(owner, kind, id, value))
                .await
                .unwrap();
        }

        let response = get_dashboard_page(State(DashboardState::from_ref(&state))).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(must_get_text(&html, "#total-gains"), "AOA 125.50");
        assert_eq!(must_get_text(&html, "#total-expenses"), "AOA 40.00");
        assert_eq!(must_get_text(&html, "#current-balance"), "AOA 85.50");
    }

    #[tokio::test]
    async fn no_transactions_shows_zero_totals() {
        let (_, state) = get_test_state();

        let response = get_dashboard_page(State(DashboardState::from_ref(&state))).await;

        let html = parse_html_document(response).await;
        assert_eq!(must_get_text(&html, "#current-balance"), "AOA 0.00");
    }

    #[tokio::test]
    async fn greets_user_by_name() {
        let (_, state) = get_test_state();
        let dashboard_state = DashboardState {
            current_user: CurrentUser::new(TEST_USER_ID, None),
            ..DashboardState::from_ref(&state)
        };

        let response = get_dashboard_page(State(dashboard_state)).await;

        let html = parse_html_document(response).await;
        assert_eq!(must_get_text(&html, "#user-name"), "Unknown user");
    }

    #[tokio::test]
    async fn store_failure_shows_error_banner() {
        let (fake, state) = get_test_state();
        fake.fail_with("permission denied");

        let response = get_dashboard_page(State(DashboardState::from_ref(&state))).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert!(must_get_text(&html, "[role=alert]").contains("permission denied"));
        assert!(
            html.select(&Selector::parse("#current-balance").unwrap())
                .next()
                .is_none()
        );
    }
}
