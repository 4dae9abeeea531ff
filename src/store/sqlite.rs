//! Implements a SQLite backed document store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params, params_from_iter, types::Value as SqlValue};
use serde_json::Value;

use crate::{
    Error,
    store::{Document, DocumentBody, DocumentStore, Filter},
};

/// Stores documents as JSON text in a SQLite database.
///
/// Filters are evaluated with SQLite's `json_extract`, so a filter on a field
/// only matches documents where the field holds a scalar equal to the filter
/// value. Filtering on `null` never matches.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Create a new store for the SQLite `connection`, creating the document table if needed.
    ///
    /// # Errors
    /// Returns an error if the lock cannot be acquired or the table cannot be created.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Result<Self, Error> {
        let store = Self { connection };
        create_document_table(&*store.lock()?)?;

        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLock)
    }
}

/// Create the document table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_document_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS document (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, id)
                )",
        (),
    )?;

    Ok(())
}

impl DocumentStore for SqliteDocumentStore {
    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, Error> {
        let mut sql = String::from("SELECT id, body FROM document WHERE collection = ?");
        let mut parameters = vec![SqlValue::Text(collection.to_owned())];

        for filter in filters {
            sql.push_str(" AND json_extract(body, ?) = ?");
            parameters.push(SqlValue::Text(json_path(&filter.field)));
            parameters.push(to_sql_value(&filter.value));
        }

        sql.push_str(" ORDER BY rowid");

        let connection = self.lock()?;
        let rows = connection
            .prepare(&sql)?
            .query_map(params_from_iter(parameters), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        rows.into_iter()
            .map(|(id, body)| parse_document(id, &body))
            .collect()
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, Error> {
        let connection = self.lock()?;
        let body: Option<String> = connection
            .query_row(
                "SELECT body FROM document WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| parse_document(id.to_owned(), &body))
            .transpose()
    }

    fn set(&self, collection: &str, id: &str, body: &DocumentBody) -> Result<(), Error> {
        let body = serde_json::to_string(body)?;
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO document (collection, id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body",
            params![collection, id, body],
        )?;

        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), Error> {
        let connection = self.lock()?;
        let rows_affected = connection.execute(
            "DELETE FROM document WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )?;

        if rows_affected == 0 {
            tracing::debug!("delete of missing document {collection}/{id} ignored");
        }

        Ok(())
    }
}

fn parse_document(id: String, body: &str) -> Result<Document, Error> {
    let body: DocumentBody = serde_json::from_str(body)?;

    Ok(Document { id, body })
}

/// Build a JSON path for a top-level field, quoting it so that dots in the name are literal.
fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', ""))
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(value) => SqlValue::Integer(i64::from(*value)),
        Value::Number(number) => number
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| number.as_f64().map(SqlValue::Real))
            .unwrap_or(SqlValue::Null),
        Value::String(text) => SqlValue::Text(text.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}
