use axum::{
    debug_handler,
    extract::{FromRef, Path, State},
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
        TransactionId, form::TransactionForm, repository::fetch_owned_transaction,
        write_transaction,
    },
    user::CurrentUser,
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    pub store: SharedStore,
    pub current_user: CurrentUser,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Luanda".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            current_user: state.current_user.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for saving changes to a transaction.
///
/// The form is checked before the store is called. On success the client is sent back to the
/// list the transaction belongs to.
#[debug_handler]
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    match update(&state, &transaction_id, form).await {
        Ok(redirect_url) => {
            (HxRedirect(redirect_url.to_owned()), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

async fn update(
    state: &EditTransactionState,
    transaction_id: &str,
    form: TransactionForm,
) -> Result<&'static str, Error> {
    let timezone = require_timezone(&state.local_timezone)?;
    let fields = form.validate(timezone)?;

    let stored =
        fetch_owned_transaction(&state.store, transaction_id, &state.current_user.id).await?;
    let updated = fields.merge_into(stored);

    write_transaction(&state.store, transaction_id, &updated).await?;

    Ok(updated.kind.list_view())
}
