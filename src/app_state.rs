//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use crate::{
    Error,
    chart::{ChartRenderer, EChartsRenderer},
    notification::Notifier,
    timezone::get_local_offset,
    transaction::TransactionRepository,
};

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// The ledger, shared by every request.
    pub repository: Arc<Mutex<TransactionRepository>>,

    /// Shows transient messages such as "Transaction saved".
    pub notifier: Notifier,

    /// Draws the expense breakdown chart.
    pub chart_renderer: Arc<dyn ChartRenderer>,

    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] that serves `repository` and draws charts with
    /// [EChartsRenderer].
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Europe/Moscow".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(repository: TransactionRepository, local_timezone: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            repository: Arc::new(Mutex::new(repository)),
            notifier: Notifier::default(),
            chart_renderer: Arc::new(EChartsRenderer),
            local_timezone: local_timezone.to_owned(),
        })
    }

    /// Draw charts with `chart_renderer` instead.
    pub fn with_chart_renderer(mut self, chart_renderer: Arc<dyn ChartRenderer>) -> Self {
        self.chart_renderer = chart_renderer;
        self
    }
}
