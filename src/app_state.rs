//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    store::{SharedStore, SqliteDocumentStore},
    timezone::get_timezone,
    user::CurrentUser,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The document store holding the transactions.
    pub store: SharedStore,

    /// The local timezone as a canonical timezone name, e.g. "Africa/Luanda".
    pub local_timezone: String,

    /// The user whose transactions are shown.
    pub current_user: CurrentUser,
}

impl AppState {
    /// Create a new [AppState] backed by a SQLite database connection.
    ///
    /// This function will initialize the database by adding the document table.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Africa/Luanda".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the timezone is not valid.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        current_user: CurrentUser,
    ) -> Result<Self, Error> {
        let store = SqliteDocumentStore::new(Arc::new(Mutex::new(db_connection)))?;

        Self::with_store(Arc::new(store), local_timezone, current_user)
    }

    /// Create a new [AppState] for an existing document store.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if `local_timezone` is not a canonical timezone name.
    pub fn with_store(
        store: SharedStore,
        local_timezone: &str,
        current_user: CurrentUser,
    ) -> Result<Self, Error> {
        if get_timezone(local_timezone).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        Ok(Self {
            store,
            local_timezone: local_timezone.to_owned(),
            current_user,
        })
    }
}
