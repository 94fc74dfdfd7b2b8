//! Transient success and error messages.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use derive_more::Display;

/// How long a notification stays visible unless configured otherwise.
pub const DEFAULT_DISMISS_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NotificationKind {
    #[display("success")]
    Success,
    #[display("error")]
    Error,
}

/// A message that is shown once and disappears after a delay
/// or when dismissed, whichever comes first.
///
/// The dismiss callback runs at most once.
pub struct Notification {
    kind: NotificationKind,
    message: String,
    delay: Duration,
    shown_at: Instant,
    visible: bool,
    on_dismiss: Option<Box<dyn FnOnce() + Send>>,
}

impl Debug for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notification")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("delay", &self.delay)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            delay: DEFAULT_DISMISS_DELAY,
            shown_at: Instant::now(),
            visible: true,
            on_dismiss: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn on_dismiss(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_dismiss = Some(Box::new(callback));
        self
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn shown_at(&self) -> Instant {
        self.shown_at
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide the notification and run the dismiss callback.
    pub fn dismiss(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        if let Some(callback) = self.on_dismiss.take() {
            callback();
        }
    }

    /// Dismiss the notification if its delay has elapsed at `now`.
    ///
    /// Returns whether this call dismissed it.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.visible && now.saturating_duration_since(self.shown_at) >= self.delay {
            self.dismiss();
            return true;
        }
        false
    }

    /// Time left until the notification is dismissed automatically.
    pub fn remaining(&self, now: Instant) -> Duration {
        if !self.visible {
            return Duration::ZERO;
        }
        self.delay
            .saturating_sub(now.saturating_duration_since(self.shown_at))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting(notification: Notification) -> (Notification, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let notification = notification.on_dismiss(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (notification, calls)
    }

    #[test]
    fn auto_dismisses_after_delay() {
        let (mut notification, calls) = counting(Notification::success("Producto creado"));
        let shown_at = notification.shown_at();

        assert!(!notification.tick(shown_at + Duration::from_millis(4999)));
        assert!(notification.is_visible());
        assert_eq!(
            notification.remaining(shown_at + Duration::from_secs(3)),
            Duration::from_secs(2)
        );

        assert!(notification.tick(shown_at + DEFAULT_DISMISS_DELAY));
        assert!(!notification.is_visible());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_runs_once() {
        let (mut notification, calls) = counting(Notification::error("Error"));
        let later = notification.shown_at() + Duration::from_secs(60);

        notification.dismiss();
        notification.dismiss();
        assert!(!notification.tick(later));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(notification.remaining(later), Duration::ZERO);
    }

    #[test]
    fn custom_delay() {
        let mut notification =
            Notification::success("Guardado").with_delay(Duration::from_secs(1));
        let shown_at = notification.shown_at();

        assert_eq!(notification.kind(), NotificationKind::Success);
        assert_eq!(notification.message(), "Guardado");
        assert!(notification.tick(shown_at + Duration::from_secs(1)));
    }
}
