//! SMTP mailer using Lettre.

use crate::config::SmtpConfig;
use festival_core::{MailError, Mailer, OutboundEmail};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP mailer.
///
/// Sends through a relay over TLS; each message is submitted on the
/// blocking thread pool.
#[derive(Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl SmtpMailer {
    /// Create a mailer for `host:port`, authenticating when both username
    /// and password are given.
    #[must_use]
    pub fn new(host: String, port: u16, username: Option<String>, password: Option<String>) -> Self {
        let credentials = username
            .zip(password)
            .map(|(username, password)| Credentials::new(username, password));
        Self {
            host,
            port,
            credentials,
        }
    }

    /// Create a mailer from configuration; `None` when no relay host is set.
    #[must_use]
    pub fn from_config(config: &SmtpConfig) -> Option<Self> {
        config.host.clone().map(|host| {
            Self::new(
                host,
                config.port,
                config.username.clone(),
                config.password.clone(),
            )
        })
    }

    fn build_transport(&self) -> Result<SmtpTransport, MailError> {
        let builder = SmtpTransport::relay(&self.host)
            .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?
            .port(self.port);
        Ok(match &self.credentials {
            Some(credentials) => builder.credentials(credentials.clone()).build(),
            None => builder.build(),
        })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e| MailError::InvalidAddress(format!("{address}: {e}")))
}

/// Assemble a MIME message: the HTML body with its inline images, plus a
/// file attachment of each image.
///
/// # Errors
///
/// Returns error if an address or content type is malformed.
pub fn build_message(email: &OutboundEmail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox(&email.from)?)
        .to(mailbox(&email.to)?)
        .subject(email.subject.clone());
    for cc in &email.cc {
        builder = builder.cc(mailbox(cc)?);
    }

    let mut related = MultiPart::related().singlepart(SinglePart::html(email.html.clone()));
    let mut attachments = Vec::with_capacity(email.images.len());
    for image in &email.images {
        let content_type = ContentType::parse(&image.content_type)
            .map_err(|e| MailError::Build(format!("{}: {e}", image.content_type)))?;
        related = related.singlepart(
            Attachment::new_inline(image.content_id.clone())
                .body(image.bytes.clone(), content_type.clone()),
        );
        attachments.push(Attachment::new(image.filename.clone()).body(image.bytes.clone(), content_type));
    }

    let body = attachments
        .into_iter()
        .fold(MultiPart::mixed().multipart(related), MultiPart::singlepart);

    builder
        .multipart(body)
        .map_err(|e| MailError::Build(e.to_string()))
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let message = build_message(&email)?;
        let transport = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map_err(|e| MailError::Transport(format!("Failed to send email: {e}")))
        })
        .await
        .map_err(|e| MailError::Transport(format!("Email task failed: {e}")))?
        .map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use festival_core::EmbeddedImage;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "Hackathon <hackathon@festival.example.edu>".into(),
            to: "lead@example.com".into(),
            cc: vec!["organizers@festival.example.edu".into()],
            subject: "Registration received".into(),
            html: "<p>Hello</p><img src=\"cid:registration-qr\">".into(),
            images: vec![EmbeddedImage {
                content_id: "registration-qr".into(),
                filename: "registration.png".into(),
                content_type: "image/png".into(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }],
        }
    }

    #[test]
    fn test_message_has_inline_and_attached_image() {
        let formatted = String::from_utf8(build_message(&email()).unwrap().formatted()).unwrap();
        assert!(formatted.contains("Cc: organizers@festival.example.edu"));
        assert!(formatted.contains("multipart/related"));
        assert!(formatted.contains("Content-ID: <registration-qr>"));
        assert!(formatted.contains("filename=\"registration.png\""));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let mut email = email();
        email.to = "not an address".into();
        assert!(matches!(
            build_message(&email),
            Err(MailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_from_config_requires_host() {
        let config = SmtpConfig {
            host: None,
            port: 587,
            username: None,
            password: None,
        };
        assert!(SmtpMailer::from_config(&config).is_none());
    }
}
