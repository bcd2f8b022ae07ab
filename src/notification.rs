//! Transient status messages, e.g. "Transaction saved".
//!
//! Only one notification is visible at a time. Showing a new one replaces the
//! old one and restarts the dismiss timer; a timer that belongs to a replaced
//! notification never dismisses its successor.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use crate::alert::Alert;

/// How long a notification stays visible.
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Default)]
struct NotificationState {
    /// Incremented for every new notification so that stale timers can tell
    /// that they have been superseded.
    generation: u64,
    message: Option<String>,
}

/// Holds the notification that is currently visible.
///
/// Clones share the same notification.
#[derive(Debug, Clone)]
pub struct Notifier {
    state: Arc<Mutex<NotificationState>>,
    duration: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTIFICATION_DURATION)
    }
}

impl Notifier {
    /// Create a notifier whose notifications are dismissed after `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(NotificationState::default())),
            duration,
        }
    }

    /// Show `message`, replacing any visible notification, and schedule its
    /// dismissal.
    ///
    /// Must be called from within a tokio runtime. Returns the alert to send
    /// to the client.
    pub fn notify(&self, message: &str) -> Alert {
        let generation = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.generation += 1;
            state.message = Some(message.to_owned());
            state.generation
        };

        tracing::debug!("Showing notification #{generation}: {message}");

        let state = Arc::clone(&self.state);
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation == generation {
                state.message = None;
                tracing::debug!("Dismissed notification #{generation}");
            }
        });

        Alert::SuccessSimple {
            message: message.to_owned(),
        }
    }

    /// The message of the visible notification, if any.
    pub fn current(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .message
            .clone()
    }

    /// The visible notification as an alert, if any.
    pub(crate) fn current_alert(&self) -> Option<Alert> {
        self.current()
            .map(|message| Alert::SuccessSimple { message })
    }
}
