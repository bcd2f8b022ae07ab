//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the fixed `#alert-container` at the bottom of the
//! page, either as the body of an error response or as an out-of-band swap
//! alongside a successful response. Swapping a new alert in replaces whatever
//! alert was shown before.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

use crate::notification::NOTIFICATION_DURATION;

/// An alert message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with details on how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert box.
    ///
    /// The box carries the number of milliseconds after which the client
    /// should dismiss it.
    pub fn into_html(self) -> Markup {
        let dismiss_after_ms = NOTIFICATION_DURATION.as_millis();

        match self {
            Alert::SuccessSimple { message } => html!(
                div
                    role="status"
                    data-alert="success"
                    data-dismiss-after=(dismiss_after_ms)
                    class="p-4 mb-4 text-sm text-green-800 rounded bg-green-50
                        dark:bg-gray-800 dark:text-green-400 shadow"
                {
                    span class="font-medium" { (message) }
                }
            ),
            Alert::Error { message, details } => html!(
                div
                    role="alert"
                    data-alert="error"
                    data-dismiss-after=(dismiss_after_ms)
                    class="p-4 mb-4 text-sm text-red-800 rounded bg-red-50
                        dark:bg-gray-800 dark:text-red-400 shadow"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p { (details) }
                    }
                }
            ),
        }
    }

    /// Render the alert so that htmx swaps it into the alert container of the
    /// current page, replacing any alert already there.
    pub fn into_oob_html(self) -> Markup {
        html!(
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_html())
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        let status_code = match self {
            Alert::SuccessSimple { .. } => StatusCode::OK,
            Alert::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status_code, Html(self.into_html().into_string())).into_response()
    }
}
