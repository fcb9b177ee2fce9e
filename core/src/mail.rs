//! Outbound mail provider trait.

use thiserror::Error;

/// Image carried by an email, referenced inline by `cid:` and attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Content id used in `<img src="cid:...">`.
    pub content_id: String,
    /// File name of the attachment copy.
    pub filename: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// A fully rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Images embedded inline and attached.
    pub images: Vec<EmbeddedImage>,
}

/// Mail delivery errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    /// An address could not be parsed.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("Failed to build email: {0}")]
    Build(String),

    /// The relay rejected the message or could not be reached.
    #[error("Email delivery failed: {0}")]
    Transport(String),
}

/// Mail relay provider.
///
/// Abstracts over the SMTP relay used in production and the console or
/// recording mailers used in development and tests.
pub trait Mailer: Send + Sync {
    /// Send one email.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - An address is malformed
    /// - The message cannot be built
    /// - The relay rejects the message
    fn send(
        &self,
        email: OutboundEmail,
    ) -> impl std::future::Future<Output = Result<(), MailError>> + Send;
}
