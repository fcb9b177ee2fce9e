//! Pipeline error type.

use festival_auth::AuthError;
use festival_core::FestivalError;
use festival_web::AppError;
use thiserror::Error;

/// Errors returned by the request pipelines.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Validation, lookup or configuration error from the domain.
    #[error(transparent)]
    Domain(#[from] FestivalError),

    /// Login or session error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A storage call failed. `context` is the message shown to the client.
    #[error("{context}")]
    Persistence {
        /// Client-facing description.
        context: &'static str,
        /// Underlying storage error, logged only.
        #[source]
        source: FestivalError,
    },
}

impl PipelineError {
    /// Wrap a storage error with a client-facing description.
    #[must_use]
    pub const fn persistence(context: &'static str, source: FestivalError) -> Self {
        Self::Persistence { context, source }
    }

    /// Returns `true` if this error is caused by the request.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Domain(err) => err.is_user_error(),
            Self::Auth(err) => err.is_user_error(),
            Self::Persistence { .. } => false,
        }
    }
}

/// Shorthand for mapping a storage error into [`PipelineError::Persistence`].
pub(crate) fn persistence(context: &'static str) -> impl FnOnce(FestivalError) -> PipelineError {
    move |source| PipelineError::persistence(context, source)
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Domain(err) => err.into(),
            PipelineError::Auth(err) => err.into(),
            PipelineError::Persistence { context, source } => {
                Self::internal(context).with_source(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                PipelineError::from(FestivalError::AlreadyRegistered),
                StatusCode::BAD_REQUEST,
            ),
            (
                PipelineError::from(FestivalError::NotFound),
                StatusCode::NOT_FOUND,
            ),
            (
                PipelineError::from(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                PipelineError::persistence(
                    "Failed to create registration",
                    FestivalError::Storage("connection reset".into()),
                ),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_persistence_hides_cause() {
        let err = AppError::from(PipelineError::persistence(
            "Failed to create registration",
            FestivalError::Storage("password authentication failed for user".into()),
        ));
        assert_eq!(err.message(), "Failed to create registration");
    }
}
