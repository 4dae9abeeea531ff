//! The fields shared by the create and edit transaction forms, and their validation.

use maud::{Markup, html};
use serde::Deserialize;
use time_tz::Tz;

use crate::{
    Error,
    date::parse_date_to_timestamp,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    transaction::{Timestamp, Transaction, TransactionKind},
};

/// Shown when the title is blank or the value is not a number.
pub const INVALID_FIELDS_MESSAGE: &str = "Fill in all fields correctly.";

/// Shown when the date is not a real `YYYY-MM-DD` date.
pub const INVALID_DATE_MESSAGE: &str = "Enter a valid date in the format YYYY-MM-DD.";

/// The raw form data for creating or editing a transaction.
///
/// Every field is kept as text so that bad input is reported by [TransactionForm::validate]
/// instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub date: String,
    /// Only read when creating, an edit keeps the stored kind.
    #[serde(default)]
    pub kind: TransactionKind,
}

/// The fields of a [TransactionForm] that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    pub title: String,
    pub description: String,
    pub value: f64,
    pub date: Option<Timestamp>,
}

impl TransactionForm {
    /// Check the form and convert its fields, reading dates as local midnight in `timezone`.
    ///
    /// # Errors
    /// Returns [Error::InvalidForm] if the title is blank, the value is not a finite number,
    /// or the date is set but is not a valid date.
    pub fn validate(&self, timezone: &Tz) -> Result<ValidatedFields, Error> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidForm(INVALID_FIELDS_MESSAGE.to_owned()));
        }

        let value = self
            .value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| Error::InvalidForm(INVALID_FIELDS_MESSAGE.to_owned()))?;

        let date = match self.date.trim() {
            "" => None,
            date => Some(
                parse_date_to_timestamp(date, timezone)
                    .ok_or_else(|| Error::InvalidForm(INVALID_DATE_MESSAGE.to_owned()))?,
            ),
        };

        Ok(ValidatedFields {
            title: title.to_owned(),
            description: self.description.trim().to_owned(),
            value,
            date,
        })
    }
}

impl ValidatedFields {
    /// Replace the editable fields of `transaction`, keeping its ID, owner and kind.
    pub fn merge_into(self, transaction: Transaction) -> Transaction {
        Transaction {
            title: self.title,
            description: self.description,
            value: self.value,
            date: self.date,
            ..transaction
        }
    }
}

/// The values to pre-fill the form fields with.
#[derive(Debug, Default)]
pub struct TransactionFormDefaults<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub value: Option<f64>,
    pub date: Option<&'a str>,
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    // The full value, so that saving an unrelated edit does not round it.
    let value_str = defaults.value.map(|value| value.to_string());

    html! {
        div
        {
            label
                for="title"
                class=(FORM_LABEL_STYLE)
            {
                "Title"
            }

            input
                name="title"
                id="title"
                type="text"
                placeholder="Title"
                required
                autofocus
                value=(defaults.title)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=(defaults.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="value"
                class=(FORM_LABEL_STYLE)
            {
                "Value"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="value"
                    id="value"
                    type="number"
                    step="any"
                    placeholder="0.00"
                    required
                    value=[value_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=[defaults.date]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
