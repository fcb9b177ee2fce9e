//! Recording mailer.

use festival_core::{MailError, Mailer, OutboundEmail};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mailer that records every message instead of sending it.
///
/// Can be switched into failure mode to simulate a relay outage. Failed
/// sends are not recorded. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingMailer {
    /// Create a mailer that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mailer that rejects every message.
    #[must_use]
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.set_failing(true);
        mailer
    }

    /// Toggle failure mode.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages accepted so far.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, email: OutboundEmail) -> impl Future<Output = Result<(), MailError>> + Send {
        let sent = Arc::clone(&self.sent);
        let failing = self.failing.load(Ordering::SeqCst);

        async move {
            if failing {
                return Err(MailError::Transport("simulated relay outage".into()));
            }
            sent.lock()
                .map_err(|_| MailError::Transport("lock poisoned".into()))?
                .push(email);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "music@festival.example.edu".into(),
            to: "a@x.com".into(),
            cc: vec![],
            subject: "Hello".into(),
            html: "<p>Hi</p>".into(),
            images: vec![],
        }
    }

    #[tokio::test]
    async fn test_records_sent_mail() {
        let mailer = RecordingMailer::new();
        mailer.send(email()).await.unwrap();
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_mode() {
        let mailer = RecordingMailer::failing();
        assert!(mailer.send(email()).await.is_err());
        assert!(mailer.sent().is_empty());

        mailer.set_failing(false);
        assert!(mailer.send(email()).await.is_ok());
    }
}
