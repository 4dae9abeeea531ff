use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use maud::html;
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    transaction::{
        TransactionId, TransactionKind, delete_transaction, fetch_transaction,
        list_page::{TransactionList, TransactionListState, render_list},
    },
};

/// Which list to respond with once the transaction is gone.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// The kind of the list the request came from, used when the transaction no longer exists.
    #[serde(default)]
    pub kind: TransactionKind,
    /// The search the list was filtered by.
    pub q: Option<String>,
}

/// A route handler for deleting a transaction.
///
/// Responds with the refreshed list fragment and a success alert. Deleting a transaction
/// that has already been deleted succeeds.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionListState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    match delete(&state, &transaction_id, query).await {
        Ok(response) => response,
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

async fn delete(
    state: &TransactionListState,
    transaction_id: &str,
    query: DeleteQuery,
) -> Result<Response, Error> {
    if transaction_id.trim().is_empty() {
        tracing::error!("refusing to delete a transaction with a blank ID");
        return Err(Error::InvalidArgument(
            "the transaction ID must not be blank".to_owned(),
        ));
    }

    let stored_kind = match fetch_transaction(&state.store, transaction_id).await {
        Ok(transaction) if transaction.user_id != state.current_user.id => {
            tracing::warn!(
                "user {} tried to delete transaction {transaction_id} owned by someone else",
                state.current_user.id
            );
            return Err(Error::NotFound);
        }
        Ok(transaction) => Some(transaction.kind),
        Err(Error::NotFound) => {
            tracing::debug!("transaction {transaction_id} was already deleted");
            None
        }
        Err(error) => return Err(error),
    };

    // The response replaces the list on the page, so there must be a list to send back.
    let list = stored_kind
        .as_ref()
        .and_then(TransactionList::for_kind)
        .or_else(|| TransactionList::for_kind(&query.kind))
        .ok_or_else(|| {
            tracing::error!(
                "no list to refresh after deleting {transaction_id}, kind {:?}",
                query.kind
            );
            Error::InvalidArgument(
                "the list to refresh must be given as kind=despesa or kind=ganho".to_owned(),
            )
        })?;

    delete_transaction(&state.store, transaction_id).await?;

    refreshed_list(state, list, query.q.as_deref()).await
}

async fn refreshed_list(
    state: &TransactionListState,
    list: TransactionList,
    search: Option<&str>,
) -> Result<Response, Error> {
    let list = render_list(list, state, search.map(str::trim).unwrap_or_default()).await?;
    let alert = Alert::success("Transaction deleted", "").into_html();

    Ok(Html(html! { (list) (alert) }.into_string()).into_response())
}
