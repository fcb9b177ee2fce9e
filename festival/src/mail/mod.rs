//! Outbound email: relay implementations and templates.

pub mod console;
pub mod smtp;
pub mod templates;

pub use console::ConsoleMailer;
pub use smtp::SmtpMailer;
pub use templates::{confirmation_email, qr_image, status_email, StatusEmail, StatusNotice};

use crate::config::SmtpConfig;
use festival_core::{MailError, Mailer, OutboundEmail};

/// Mailer selected at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredMailer {
    /// SMTP relay.
    Smtp(SmtpMailer),
    /// Console output.
    Console(ConsoleMailer),
}

impl ConfiguredMailer {
    /// SMTP when a relay host is configured, console otherwise.
    #[must_use]
    pub fn from_config(config: &SmtpConfig) -> Self {
        match SmtpMailer::from_config(config) {
            Some(smtp) => {
                tracing::info!(host = ?config.host, port = config.port, "Using SMTP mailer");
                Self::Smtp(smtp)
            }
            None => {
                tracing::warn!("SMTP_HOST not set, emails will be logged to the console");
                Self::Console(ConsoleMailer)
            }
        }
    }
}

impl Mailer for ConfiguredMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        match self {
            Self::Smtp(mailer) => mailer.send(email).await,
            Self::Console(mailer) => mailer.send(email).await,
        }
    }
}
