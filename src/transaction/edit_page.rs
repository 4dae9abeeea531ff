use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time_tz::Tz;

use crate::{
    AppState, Error,
    date::format_timestamp_as_date,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, base, error_banner,
        loading_spinner,
    },
    navigation::NavBar,
    not_found::get_404_not_found_response,
    screen::{Screen, ScreenState},
    store::SharedStore,
    timezone::require_timezone,
    transaction::{
        Transaction, TransactionId,
        form::{TransactionFormDefaults, transaction_form_fields},
        repository::fetch_owned_transaction,
    },
    user::CurrentUser,
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    pub store: SharedStore,
    pub current_user: CurrentUser,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Luanda".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            current_user: state.current_user.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
///
/// Responds with the 404 page if the transaction does not exist or belongs to another user.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let timezone = require_timezone(&state.local_timezone)?;

    let screen = Screen::new();
    let store = state.store.clone();
    let user_id = state.current_user.id.clone();
    let id = transaction_id.clone();
    let screen_state = screen
        .load(async move {
            match fetch_owned_transaction(&store, &id, &user_id).await {
                Ok(transaction) => Ok(Some(transaction)),
                Err(Error::NotFound) => Ok(None),
                Err(error) => Err(error),
            }
        })
        .await;

    let content = match screen_state {
        ScreenState::Ready(None) => return Ok(get_404_not_found_response()),
        ScreenState::Ready(Some(transaction)) => {
            edit_form_view(&transaction_id, &transaction, timezone)
        }
        ScreenState::Error(message) => error_banner("Could not load the transaction", &message),
        ScreenState::Loading => loading_spinner(),
    };

    Ok(edit_transaction_view(content).into_response())
}

fn edit_transaction_view(content: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();

    let page = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (content)
        }
    };

    base("Edit Transaction", &page)
}

fn edit_form_view(id: &str, transaction: &Transaction, timezone: &Tz) -> Markup {
    let date = transaction
        .date
        .and_then(|timestamp| format_timestamp_as_date(timestamp, timezone));
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        title: &transaction.title,
        description: &transaction.description,
        value: Some(transaction.value),
        date: date.as_deref(),
    });

    html! {
        form
            hx-put=(format_endpoint(endpoints::TRANSACTION, id))
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Edit " (transaction.kind.label()) }

            (form_fields)

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (loading_spinner())
                }
                " Save Changes"
            }

            a href=(transaction.kind.list_view()) class=(BUTTON_SECONDARY_STYLE)
            {
                "Cancel"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        test_utils::{
            TEST_USER_ID, assert_form_input_with_value, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, get_test_state, must_get_form, parse_html_document,
        },
        transaction::{
            Transaction, TransactionKind,
            edit_page::{EditTransactionPageState, get_edit_transaction_page},
            write_transaction,
        },
    };

    #[tokio::test]
    async fn prefills_form_with_transaction() {
        let (_, state) = get_test_state();
        let transaction = Transaction::build(TEST_USER_ID, TransactionKind::Expense, "Rent", 500.0)
            .description("April")
            .date(Some(1_705_276_800_000));
        write_transaction(&state.store, "abc", &transaction)
            .await
            .unwrap();

        let response = get_edit_transaction_page(
            State(EditTransactionPageState::from_ref(&state)),
            Path("abc".to_owned()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/transactions/abc", "hx-put");
        assert_form_input_with_value(&form, "title", "text", "Rent");
        assert_form_input_with_value(&form, "value", "number", "500");
        let date = form
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .expect("No date input found");
        assert_eq!(date.value().attr("value"), Some("2024-01-15"));
    }

    #[tokio::test]
    async fn unset_date_is_left_empty() {
        let (_, state) = get_test_state();
        let transaction = Transaction::build(TEST_USER_ID, TransactionKind::Income, "Gift", 5.0);
        write_transaction(&state.store, "abc", &transaction)
            .await
            .unwrap();

        let response = get_edit_transaction_page(
            State(EditTransactionPageState::from_ref(&state)),
            Path("abc".to_owned()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let date = html
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .expect("No date input found");
        assert_eq!(date.value().attr("value"), None);
    }

    #[tokio::test]
    async fn missing_transaction_is_404() {
        let (_, state) = get_test_state();

        let response = get_edit_transaction_page(
            State(EditTransactionPageState::from_ref(&state)),
            Path("missing".to_owned()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_users_transaction_is_404() {
        let (_, state) = get_test_state();
        let transaction = Transaction::build("someone-else", TransactionKind::Expense, "Rent", 1.0);
        write_transaction(&state.store, "abc", &transaction)
            .await
            .unwrap();

        let response = get_edit_transaction_page(
            State(EditTransactionPageState::from_ref(&state)),
            Path("abc".to_owned()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_failure_shows_error_banner() {
        let (fake, state) = get_test_state();
        fake.fail_with("permission denied");

        let response = get_edit_transaction_page(
            State(EditTransactionPageState::from_ref(&state)),
            Path("abc".to_owned()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let banner = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("No error banner found");
        assert!(banner.text().collect::<String>().contains("permission denied"));
        assert!(html.select(&Selector::parse("form").unwrap()).next().is_none());
    }
}
