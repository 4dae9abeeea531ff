//! Functions for reading and writing transactions in a document store.
//!
//! Each function makes at most one call to the store. Store calls are run on
//! tokio's blocking thread pool so that they never block the async runtime.

use std::sync::Arc;

use crate::{
    Error,
    store::{DocumentStore, Filter, SharedStore},
    transaction::{
        Transaction, TransactionId, TransactionKind,
        core::{KIND_FIELD, TRANSACTIONS_COLLECTION, USER_ID_FIELD},
    },
    user::UserId,
};

/// Get all of `user_id`'s transactions of the given `kind`, each with its ID set.
///
/// # Errors
/// Returns [Error::RemoteFailure] if the store query fails or a document cannot be read.
pub async fn fetch_transactions_by_kind(
    store: &SharedStore,
    user_id: &UserId,
    kind: TransactionKind,
) -> Result<Vec<Transaction>, Error> {
    let filters = vec![
        Filter::equals(USER_ID_FIELD, user_id.as_str()),
        Filter::equals(KIND_FIELD, kind.as_str()),
    ];

    query_transactions(store, filters)
        .await
        .inspect_err(|error| {
            tracing::error!("could not fetch {} transactions: {error}", kind.as_str())
        })
}

/// Get all of `user_id`'s transactions regardless of kind, each with its ID set.
///
/// # Errors
/// Returns [Error::RemoteFailure] if the store query fails or a document cannot be read.
pub async fn fetch_transactions_for_user(
    store: &SharedStore,
    user_id: &UserId,
) -> Result<Vec<Transaction>, Error> {
    let filters = vec![Filter::equals(USER_ID_FIELD, user_id.as_str())];

    query_transactions(store, filters)
        .await
        .inspect_err(|error| tracing::error!("could not fetch transactions: {error}"))
}

/// Get the transaction stored under `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if there is no transaction with the ID `id`,
/// - or [Error::RemoteFailure] if the store call fails.
pub async fn fetch_transaction(store: &SharedStore, id: &str) -> Result<Transaction, Error> {
    let owned_id = id.to_owned();
    let document = run_blocking(store, move |store| {
        store.get(TRANSACTIONS_COLLECTION, &owned_id)
    })
    .await?;

    match document {
        Some(document) => Transaction::from_document(document),
        None => {
            tracing::debug!("transaction {id} not found");
            Err(Error::NotFound)
        }
    }
}

/// Get the transaction stored under `id` if it belongs to `user_id`.
///
/// A transaction owned by someone else is reported as not found.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if there is no transaction with the ID `id` owned by `user_id`,
/// - or [Error::RemoteFailure] if the store call fails.
pub async fn fetch_owned_transaction(
    store: &SharedStore,
    id: &str,
    user_id: &UserId,
) -> Result<Transaction, Error> {
    let transaction = fetch_transaction(store, id).await?;

    if &transaction.user_id != user_id {
        tracing::warn!("user {user_id} asked for transaction {id} owned by someone else");
        return Err(Error::NotFound);
    }

    Ok(transaction)
}

/// Replace the transaction stored under `id` with `transaction`, creating it if it does not exist.
///
/// The whole document is replaced, callers must merge any edits into a complete transaction first.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidArgument] if `id` is empty, in which case the store is not called,
/// - or [Error::RemoteFailure] if the store call fails.
pub async fn write_transaction(
    store: &SharedStore,
    id: &str,
    transaction: &Transaction,
) -> Result<(), Error> {
    if id.is_empty() {
        tracing::error!("refusing to write a transaction with an empty ID");
        return Err(Error::InvalidArgument(
            "the transaction ID must not be empty".to_owned(),
        ));
    }

    let body = transaction.to_document_body()?;
    let owned_id = id.to_owned();

    run_blocking(store, move |store| {
        store.set(TRANSACTIONS_COLLECTION, &owned_id, &body)
    })
    .await
    .inspect(|_| tracing::info!("wrote transaction {id}"))
    .inspect_err(|error| tracing::error!("could not write transaction {id}: {error}"))
}

/// Delete the transaction stored under `id`.
///
/// Deleting a transaction that does not exist succeeds.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidArgument] if `id` is empty or only whitespace, in which case the store is
///   not called,
/// - or [Error::RemoteFailure] if the store call fails.
pub async fn delete_transaction(store: &SharedStore, id: &str) -> Result<(), Error> {
    if id.trim().is_empty() {
        tracing::error!("refusing to delete a transaction with a blank ID");
        return Err(Error::InvalidArgument(
            "the transaction ID must not be blank".to_owned(),
        ));
    }

    let owned_id = id.to_owned();

    run_blocking(store, move |store| {
        store.delete(TRANSACTIONS_COLLECTION, &owned_id)
    })
    .await
    .inspect(|_| tracing::info!("deleted transaction {id}"))
    .inspect_err(|error| tracing::error!("could not delete transaction {id}: {error}"))
}

/// Store `transaction` under a new ID and return it with the ID set.
///
/// # Errors
/// Returns [Error::RemoteFailure] if the store call fails.
pub async fn create_transaction(
    store: &SharedStore,
    transaction: Transaction,
) -> Result<Transaction, Error> {
    let id: TransactionId = store.new_document_id();
    write_transaction(store, &id, &transaction).await?;

    Ok(Transaction {
        id: Some(id),
        ..transaction
    })
}

async fn query_transactions(
    store: &SharedStore,
    filters: Vec<Filter>,
) -> Result<Vec<Transaction>, Error> {
    let documents = run_blocking(store, move |store| {
        store.query(TRANSACTIONS_COLLECTION, &filters)
    })
    .await?;

    documents
        .into_iter()
        .map(Transaction::from_document)
        .collect()
}

/// Run a store operation on the blocking thread pool.
async fn run_blocking<T, F>(store: &SharedStore, operation: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&dyn DocumentStore) -> Result<T, Error> + Send + 'static,
{
    let store = Arc::clone(store);

    tokio::task::spawn_blocking(move || operation(store.as_ref()))
        .await
        .map_err(|error| {
            tracing::error!("store task failed: {error}");
            Error::BackgroundTask(error.to_string())
        })?
}
