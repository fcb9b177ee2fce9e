//! Console mailer for development.
//!
//! Logs emails instead of sending them. Used when no SMTP relay is
//! configured.

use festival_core::{MailError, Mailer, OutboundEmail};
use tracing::info;

/// Console mailer (logs to stdout for development)
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

impl Mailer for ConsoleMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        info!(
            from = %email.from,
            to = %email.to,
            cc = ?email.cc,
            subject = %email.subject,
            images = email.images.len(),
            "\n\n\
            ┌────────────────────────────────────────────────────────────────┐\n\
            │                     Outgoing Email                             │\n\
            └────────────────────────────────────────────────────────────────┘\n\
            {}\n",
            email.html
        );
        Ok(())
    }
}
