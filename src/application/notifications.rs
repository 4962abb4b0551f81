// Transient user-facing notifications (toasts)
use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Sending half handed to services. Delivery is best effort: once the
/// receiver is gone notifications are dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Level::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Level::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    fn push(&self, level: Level, message: String) {
        // The receiver prints it; the log line is only for -vv traces.
        tracing::debug!(?level, %message, "notification");
        let _ = self.tx.send(Notification { level, message });
    }
}

/// A failure the user has already been shown as an error notification.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Notified(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_arrive_in_order() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.success("Login successful!");
        notifier.error("Network error loading dashboard");

        assert_eq!(rx.try_recv().unwrap().level, Level::Success);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.level, Level::Error);
        assert_eq!(second.message, "Network error loading dashboard");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.info("nobody is listening");
    }
}
