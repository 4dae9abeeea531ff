//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the page's
//! `#alert-container`.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with optional details.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.alert_type {
            AlertType::Success => {
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400"
            }
            AlertType::Error => {
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400"
            }
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style) role="alert" data-alert-type=(format!("{:?}", self.alert_type).to_lowercase())
                {
                    div class="flex justify-between gap-4"
                    {
                        span class="font-medium" { (self.message) }

                        button
                            type="button"
                            aria-label="Close"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "✕"
                        }
                    }

                    @if !self.details.is_empty() {
                        p class="mt-1" { (self.details) }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert<'_> {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
