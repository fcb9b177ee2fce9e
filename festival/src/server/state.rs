//! Application state for the festival HTTP server.

use crate::pipeline::FestivalApp;
use axum::extract::FromRef;
use festival_auth::{AdminClaims, OrganizerClaims, SessionTokens};
use festival_core::RegistrationStore;
use festival_web::ReadinessProbe;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply, every field is shared) for each request. Generic over
/// the registration store `S`, credential store `C` and mailer `M` so the
/// same router runs against Postgres in production and in-memory providers
/// in tests.
pub struct AppState<S, C, M> {
    /// Pipelines and their providers.
    pub app: FestivalApp<S, C, M>,
    /// Set the `Secure` attribute on session cookies.
    pub cookie_secure: bool,
}

impl<S, C, M> AppState<S, C, M> {
    /// Create a new application state.
    #[must_use]
    pub const fn new(app: FestivalApp<S, C, M>, cookie_secure: bool) -> Self {
        Self { app, cookie_secure }
    }
}

impl<S, C, M> Clone for AppState<S, C, M> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie_secure: self.cookie_secure,
        }
    }
}

impl<S, C, M> std::fmt::Debug for AppState<S, C, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("app", &self.app)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

// Session extractors find their token service through FromRef.
impl<S, C, M> FromRef<AppState<S, C, M>> for SessionTokens<OrganizerClaims> {
    fn from_ref(state: &AppState<S, C, M>) -> Self {
        state.app.organizer_tokens.clone()
    }
}

impl<S, C, M> FromRef<AppState<S, C, M>> for SessionTokens<AdminClaims> {
    fn from_ref(state: &AppState<S, C, M>) -> Self {
        state.app.admin_tokens.clone()
    }
}

impl<S, C, M> ReadinessProbe for AppState<S, C, M>
where
    S: RegistrationStore,
    C: Send + Sync,
    M: Send + Sync,
{
    async fn database_ready(&self) -> bool {
        match self.app.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "readiness probe failed");
                false
            }
        }
    }
}
