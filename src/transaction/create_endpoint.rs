use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    store::SharedStore,
    timezone::require_timezone,
    transaction::{
        Transaction, create_transaction, form::TransactionForm, list_page::TransactionList,
    },
    user::CurrentUser,
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub store: SharedStore,
    pub current_user: CurrentUser,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Luanda".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            current_user: state.current_user.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new expense or income.
///
/// Redirects to the list for the transaction's kind on success, otherwise responds with an alert.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    match create(&state, form).await {
        Ok(list_view) => {
            (HxRedirect(list_view.to_owned()), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

async fn create(
    state: &CreateTransactionState,
    form: TransactionForm,
) -> Result<&'static str, Error> {
    let timezone = require_timezone(&state.local_timezone)?;

    let list = TransactionList::for_kind(&form.kind).ok_or_else(|| {
        tracing::warn!("rejected a new transaction with kind {:?}", form.kind);
        Error::InvalidForm("Choose whether the transaction is an expense or income.".to_owned())
    })?;

    let fields = form.validate(timezone)?;
    let transaction = fields.merge_into(Transaction::build(
        &state.current_user.id,
        list.kind(),
        "",
        0.0,
    ));

    let created = create_transaction(&state.store, transaction).await?;
    tracing::debug!("created {} {:?}", list.kind().as_str(), created.id);

    Ok(list.kind().list_view())
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;

    use crate::{
        test_utils::{TEST_USER_ID, assert_hx_redirect, get_test_state},
        transaction::{
            Transaction, TransactionKind,
            create_endpoint::{CreateTransactionState, create_transaction_endpoint},
            fetch_transactions_for_user,
            form::TransactionForm,
        },
    };

    fn expense_form(title: &str, value: &str) -> TransactionForm {
        TransactionForm {
            title: title.to_owned(),
            description: "weekly shop".to_owned(),
            value: value.to_owned(),
            date: "2024-01-15".to_owned(),
            kind: TransactionKind::Expense,
        }
    }

    #[tokio::test]
    async fn can_create_expense() {
        let (_, state) = get_test_state();

        let response = create_transaction_endpoint(
            State(CreateTransactionState::from_ref(&state)),
            Form(expense_form("Groceries", "42.5")),
        )
        .await;

        assert_hx_redirect(&response, "/expenses");
        let transactions = fetch_transactions_for_user(&state.store, &TEST_USER_ID.to_owned())
            .await
            .unwrap();
        assert_eq!(transactions.len(), 1);
        let created = &transactions[0];
        assert!(created.id.is_some());
        assert_eq!(
            Transaction {
                id: None,
                ..created.clone()
            },
            Transaction::build(TEST_USER_ID, TransactionKind::Expense, "Groceries", 42.5)
                .description("weekly shop")
                .date(Some(1_705_276_800_000))
        );
    }

    #[tokio::test]
    async fn income_redirects_to_incomes() {
        let (_, state) = get_test_state();
        let form = TransactionForm {
            kind: TransactionKind::Income,
            ..expense_form("Salary", "900")
        };

        let response =
            create_transaction_endpoint(State(CreateTransactionState::from_ref(&state)), Form(form))
                .await;

        assert_hx_redirect(&response, "/incomes");
    }

    #[tokio::test]
    async fn invalid_value_is_rejected_without_store_call() {
        let (fake, state) = get_test_state();

        let response = create_transaction_endpoint(
            State(CreateTransactionState::from_ref(&state)),
            Form(expense_form("Groceries", "abc")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let (fake, state) = get_test_state();
        let form = TransactionForm {
            kind: TransactionKind::Other("transfer".to_owned()),
            ..expense_form("Move", "1")
        };

        let response =
            create_transaction_endpoint(State(CreateTransactionState::from_ref(&state)), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_bad_gateway() {
        let (fake, state) = get_test_state();
        fake.fail_with("quota exceeded");

        let response = create_transaction_endpoint(
            State(CreateTransactionState::from_ref(&state)),
            Form(expense_form("Groceries", "1")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
