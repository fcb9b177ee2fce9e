//! Error types for authentication operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for back-office authentication.
///
/// Unknown users, inactive accounts and wrong passwords all collapse into
/// [`AuthError::InvalidCredentials`] so responses never reveal which one
/// occurred.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// Username or password missing from the request.
    #[error("Username and password are required")]
    MissingCredentials,

    /// Invalid credentials provided.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The organizer account is bound to an event that is not configured.
    #[error("Account is bound to an unknown event: {0}")]
    UnknownEvent(String),

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Signing a session token failed.
    #[error("Failed to sign session token: {0}")]
    TokenSigning(String),

    /// Hashing a password failed.
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Internal error (should not be exposed to users).
    #[error("Internal error")]
    InternalError,
}

impl AuthError {
    /// Returns `true` if this error is due to the submitted credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// # use festival_auth::AuthError;
    /// assert!(AuthError::InvalidCredentials.is_user_error());
    /// assert!(!AuthError::InternalError.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::MissingCredentials | Self::InvalidCredentials)
    }
}

#[cfg(feature = "axum")]
impl From<AuthError> for festival_web::AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => Self::bad_request(err.to_string()),
            AuthError::InvalidCredentials => Self::unauthorized(err.to_string()),
            AuthError::UnknownEvent(_)
            | AuthError::TokenSigning(_)
            | AuthError::PasswordHash(_)
            | AuthError::DatabaseError(_)
            | AuthError::InternalError => {
                Self::internal("An internal error occurred").with_source(err)
            }
        }
    }
}
