//! Defines the core data model for transactions and its document representation.

use serde::{Deserialize, Serialize};

use crate::{
    Error, endpoints,
    store::{Document, DocumentBody},
    user::UserId,
};

/// The name of the store collection that holds transactions.
pub const TRANSACTIONS_COLLECTION: &str = "transactions";

/// The document field holding the owner's ID.
pub const USER_ID_FIELD: &str = "userId";

/// The document field holding the transaction kind.
pub const KIND_FIELD: &str = "type";

/// The stored tag for expenses.
pub const EXPENSE_TAG: &str = "despesa";

/// The stored tag for income.
pub const INCOME_TAG: &str = "ganho";

/// Alias for the type used to identify a stored transaction.
pub type TransactionId = String;

/// A point in time as milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Whether a transaction is money spent or money earned.
///
/// Stored as a string tag. Tags other than [EXPENSE_TAG] and [INCOME_TAG] are
/// kept as [TransactionKind::Other] so they survive a rewrite, but such
/// transactions are not shown on either list and do not count towards any total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
    /// An unrecognised tag.
    Other(String),
}

impl TransactionKind {
    /// The tag stored in the `type` field.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Expense => EXPENSE_TAG,
            TransactionKind::Income => INCOME_TAG,
            TransactionKind::Other(tag) => tag,
        }
    }

    /// The singular name shown to the user, e.g. "Expense".
    pub fn label(&self) -> &str {
        match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
            TransactionKind::Other(tag) => tag,
        }
    }

    /// The page that lists transactions of this kind.
    ///
    /// Unrecognised kinds have no list, so they go back to the dashboard.
    pub fn list_view(&self) -> &'static str {
        match self {
            TransactionKind::Expense => endpoints::EXPENSES_VIEW,
            TransactionKind::Income => endpoints::INCOMES_VIEW,
            TransactionKind::Other(_) => endpoints::DASHBOARD_VIEW,
        }
    }
}

impl Default for TransactionKind {
    fn default() -> Self {
        TransactionKind::Other(String::new())
    }
}

impl From<String> for TransactionKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            EXPENSE_TAG => TransactionKind::Expense,
            INCOME_TAG => TransactionKind::Income,
            _ => TransactionKind::Other(tag),
        }
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Other(tag) => tag,
            kind => kind.as_str().to_owned(),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the stored document, `None` until the transaction has been written.
    pub id: Option<TransactionId>,
    /// The ID of the user that owns the transaction.
    pub user_id: UserId,
    /// A short name for the transaction.
    pub title: String,
    /// A longer text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub value: f64,
    /// When the transaction happened, `None` if the date was never set.
    pub date: Option<Timestamp>,
    /// Whether the transaction is an expense or income.
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create an unsaved transaction with an empty description and no date.
    pub fn build(user_id: &str, kind: TransactionKind, title: &str, value: f64) -> Self {
        Self {
            id: None,
            user_id: user_id.to_owned(),
            title: title.to_owned(),
            description: String::new(),
            value,
            date: None,
            kind,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the date.
    pub fn date(mut self, date: Option<Timestamp>) -> Self {
        self.date = date;
        self
    }

    /// Convert the transaction into the fields of a document.
    ///
    /// The ID is not part of the body, it is the key the document is stored under.
    ///
    /// # Errors
    /// Returns [Error::RemoteFailure] if the transaction cannot be serialized.
    pub fn to_document_body(&self) -> Result<DocumentBody, Error> {
        let stored = StoredTransaction {
            user_id: self.user_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            value: self.value,
            date: self.date.unwrap_or(UNSET_DATE),
            kind: self.kind.clone(),
        };

        match serde_json::to_value(stored)? {
            serde_json::Value::Object(body) => Ok(body),
            other => Err(Error::RemoteFailure(format!(
                "expected a transaction to serialize to an object, got {other}"
            ))),
        }
    }

    /// Create a transaction from a stored document, taking the ID from the document.
    ///
    /// Fields missing from the document take their default values.
    ///
    /// # Errors
    /// Returns [Error::RemoteFailure] if a field has the wrong type.
    pub fn from_document(document: Document) -> Result<Self, Error> {
        let stored: StoredTransaction =
            serde_json::from_value(serde_json::Value::Object(document.body))?;

        Ok(Self {
            id: Some(document.id),
            user_id: stored.user_id,
            title: stored.title,
            description: stored.description,
            value: stored.value,
            date: (stored.date != UNSET_DATE).then_some(stored.date),
            kind: stored.kind,
        })
    }
}

/// Stored dates of zero mean the date was never set.
const UNSET_DATE: Timestamp = 0;

/// The document representation of a [Transaction].
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTransaction {
    #[serde(default)]
    user_id: UserId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    value: f64,
    #[serde(default)]
    date: Timestamp,
    #[serde(default, rename = "type")]
    kind: TransactionKind,
}
