//! Pocket Ledger is a small web app for keeping track of personal income and
//! expenses.
//!
//! The server keeps the whole ledger in memory, persists it as JSON to a
//! [DurableStore] after every change, and serves HTML pages and fragments
//! that are driven by htmx in the browser.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod alert;
mod app_state;
mod chart;
mod endpoints;
mod html;
mod internal_server_error;
mod ledger;
mod logging;
mod not_found;
mod notification;
mod routing;
mod store;
mod timezone;
mod transaction;

pub use aggregation::{ExpensesByCategory, Summary, balance, expenses_by_category, total_by_type};
pub use app_state::AppState;
pub use chart::{CategoryChartData, ChartRenderer, EChartsRenderer};
pub use ledger::{FilterQuery, TransactionFilter, TransactionForm, filter_transactions};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use notification::{NOTIFICATION_DURATION, Notifier};
pub use routing::build_router;
pub use store::{DurableStore, JsonFileStore, MemoryStore};
pub use timezone::get_local_offset;
pub use transaction::{
    Category, TRANSACTION_ID_LENGTH, TRANSACTIONS_BACKUP_KEY, TRANSACTIONS_KEY, Transaction,
    TransactionDraft, TransactionId, TransactionRepository, TransactionType,
};

use crate::{alert::Alert, internal_server_error::InternalServerError};

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
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
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
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// Reading from or writing to the durable store failed.
    ///
    /// Callers should pass in the key that was accessed and the original error as a string.
    #[error("could not access the store key \"{0}\": {1}")]
    StoreError(String, String),

    /// An error occurred while serializing the ledger as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The submitted amount is not a finite number, e.g. "NaN" or "inf".
    #[error("invalid amount {0}")]
    InvalidAmountError(String),

    /// Could not acquire the ledger lock.
    #[error("could not acquire the ledger lock")]
    LedgerLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::LedgerLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// The alert to show the user when this error interrupts their action.
    fn into_alert(self) -> Alert {
        match self {
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            },
            Error::StoreError(..) | Error::JSONSerializationError(_) => Alert::Error {
                message: "Could not save your transactions".to_owned(),
                details: "The change is visible now but may be lost when the server restarts. \
                    Check the server logs for more details."
                    .to_owned(),
            },
            Error::InvalidAmountError(amount) => Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!("\"{amount}\" is not an amount of money, enter a number such as 12.50."),
            },
            Error::LedgerLockError => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        }
    }

    fn into_alert_response(self) -> Response {
        match self {
            // The user can fix this one, so it is not a server error.
            error @ Error::InvalidAmountError(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(error.into_alert().into_html().into_string()),
            )
                .into_response(),
            error => error.into_alert().into_response(),
        }
    }
}
