//! Wallet is a web app for keeping track of your expenses and income.
//!
//! This library provides a REST API that directly serves HTML pages. Transactions are kept in a
//! [DocumentStore](store::DocumentStore), and every page derives what it shows (lists of expenses
//! or income, and the balance on the dashboard) from a fresh fetch.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod date;
mod endpoints;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod routing;
mod screen;
pub mod store;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use date::{format_timestamp_as_date, parse_date_to_timestamp};
pub use routing::build_router;
pub use screen::{Screen, ScreenState, TaskScope};
pub use transaction::{
    Timestamp, Transaction, TransactionId, TransactionKind, create_transaction, delete_transaction,
    fetch_transaction, fetch_transactions_by_kind, fetch_transactions_for_user, write_transaction,
};
pub use user::{CurrentUser, UserId};

pub use dashboard::{Totals, aggregate};

use crate::{
    alert::Alert, internal_server_error::InternalServerError, not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    /// An identifier passed to a write or delete was empty or blank.
    ///
    /// This is detected before the document store is contacted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The document store reported an error.
    ///
    /// The message from the store is kept verbatim so that it can be shown to the user.
    #[error("{0}")]
    RemoteFailure(String),

    /// A submitted form could not be parsed or failed validation.
    #[error("{0}")]
    InvalidForm(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// A background task for a store operation panicked or was cancelled.
    #[error("background task failed: {0}")]
    BackgroundTask(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::RemoteFailure(error.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        tracing::error!("could not convert document: {value}");
        Error::RemoteFailure(format!("malformed document: {value}"))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezone(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::RemoteFailure(message) => InternalServerError {
                description: "Could not load data",
                fix: &message,
            }
            .into_response(),
            Error::DatabaseLock => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for HTMX requests.
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidForm(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::error("Invalid transaction", &message),
            )
                .into_response(),
            Error::InvalidArgument(message) => (
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid transaction ID", &message),
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Transaction not found",
                    "The transaction could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            )
                .into_response(),
            Error::RemoteFailure(message) => (
                StatusCode::BAD_GATEWAY,
                Alert::error("The request to the store failed", &message),
            )
                .into_response(),
            Error::InvalidTimezone(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                ),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn sql_errors_keep_their_message() {
        let error: Error = rusqlite::Error::InvalidQuery.into();

        assert_eq!(
            error,
            Error::RemoteFailure(rusqlite::Error::InvalidQuery.to_string())
        );
    }

    #[test]
    fn not_found_renders_404_page() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_form_renders_alert() {
        let response = Error::InvalidForm("bad value".to_owned()).into_alert_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
