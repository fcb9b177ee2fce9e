//! Error types for registration and back-office operations.

use thiserror::Error;

/// Result type alias for festival domain operations.
pub type Result<T> = std::result::Result<T, FestivalError>;

/// Error taxonomy for the festival domain.
///
/// Variants are grouped by how the HTTP boundary reports them: user errors
/// become 400, a missing registration 404, storage failures 500.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FestivalError {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════

    /// No event with this id exists in the registry.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// A submitted field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The email is already registered for this event.
    #[error("This email is already registered for this event")]
    AlreadyRegistered,

    /// The table name does not belong to any configured event.
    #[error("Unknown registration table: {0}")]
    UnknownTable(String),

    /// The event catalog itself is inconsistent.
    #[error("Invalid event configuration: {0}")]
    Configuration(String),

    // ═══════════════════════════════════════════════════════════
    // Lookup Errors
    // ═══════════════════════════════════════════════════════════

    /// Registration not found.
    #[error("Registration not found")]
    NotFound,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FestivalError {
    /// Shorthand for a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns `true` if this error is caused by the submitted input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use festival_core::FestivalError;
    /// assert!(FestivalError::AlreadyRegistered.is_user_error());
    /// assert!(!FestivalError::Storage("timeout".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEvent(_)
                | Self::Validation(_)
                | Self::AlreadyRegistered
                | Self::UnknownTable(_)
        )
    }
}
