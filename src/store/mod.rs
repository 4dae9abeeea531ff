//! The document store that holds the app's data.
//!
//! A store keeps JSON documents in named collections. Documents are addressed by
//! a string ID and can be queried by equality on top-level fields.

mod sqlite;

use std::{fmt::Debug, sync::Arc};

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::Error;

pub use sqlite::{SqliteDocumentStore, create_document_table};

/// The identifier of a document within a collection.
pub type DocumentId = String;

/// The fields of a document.
pub type DocumentBody = Map<String, Value>;

/// A document read from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The ID the document is stored under.
    pub id: DocumentId,
    /// The document's fields.
    pub body: DocumentBody,
}

/// An equality filter on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The name of the field.
    pub field: String,
    /// The value the field must equal.
    pub value: Value,
}

impl Filter {
    /// Match documents where `field` equals `value`.
    pub fn equals(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_owned(),
            value: value.into(),
        }
    }

    /// Whether `body` satisfies this filter.
    pub fn matches(&self, body: &DocumentBody) -> bool {
        body.get(&self.field) == Some(&self.value)
    }
}

/// Handles reading and writing documents.
///
/// Implementations are synchronous; callers that run on the async runtime
/// should move calls onto a blocking thread.
pub trait DocumentStore: Debug + Send + Sync {
    /// Get every document in `collection` that satisfies all of `filters`.
    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, Error>;

    /// Get the document stored under `id`, or `None` if there is no such document.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, Error>;

    /// Replace the document stored under `id` with `body`, creating it if needed.
    fn set(&self, collection: &str, id: &str, body: &DocumentBody) -> Result<(), Error>;

    /// Delete the document stored under `id`.
    ///
    /// Deleting a document that does not exist is not an error.
    fn delete(&self, collection: &str, id: &str) -> Result<(), Error>;

    /// Generate an ID for a new document.
    fn new_document_id(&self) -> DocumentId {
        Uuid::new_v4().to_string()
    }
}

/// A document store shared between request handlers.
pub type SharedStore = Arc<dyn DocumentStore>;
