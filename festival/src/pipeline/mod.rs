//! Request pipelines.
//!
//! Every operation the HTTP API exposes is a method on [`FestivalApp`], which
//! owns the registry, the providers and the session token services. Handlers
//! only translate between HTTP and these methods, so the whole behavior can
//! be driven in tests with in-memory providers.

pub mod check_in;
pub mod error;
pub mod listing;
pub mod login;
pub mod registration;
pub mod stats;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

pub use check_in::CheckInOutcome;
pub use error::PipelineError;
pub use listing::{EventFilter, ListedRegistration};
pub use login::{AdminLogin, LoginRequest, OrganizerLogin};
pub use registration::Registered;
pub use stats::{CatalogEntry, EventSummary};
pub use status::{StatusUpdate, StatusUpdated};

use crate::config::{AuthConfig, MailConfig};
use festival_auth::{AdminClaims, OrganizerClaims, SessionTokens};
use festival_core::{Clock, EventDefinition, EventRegistry, FestivalError};
use std::sync::Arc;

/// The festival application: registry, providers and token services.
///
/// Cheap to clone; every field is shared.
pub struct FestivalApp<S, C, M> {
    /// Event catalog.
    pub registry: Arc<EventRegistry>,
    /// Registration tables.
    pub store: Arc<S>,
    /// Back-office accounts.
    pub credentials: Arc<C>,
    /// Outbound mail relay.
    pub mailer: Arc<M>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Organizer session tokens.
    pub organizer_tokens: SessionTokens<OrganizerClaims>,
    /// Admin session tokens.
    pub admin_tokens: SessionTokens<AdminClaims>,
    /// Email content settings.
    pub mail: Arc<MailConfig>,
}

impl<S, C, M> Clone for FestivalApp<S, C, M> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
            credentials: Arc::clone(&self.credentials),
            mailer: Arc::clone(&self.mailer),
            clock: Arc::clone(&self.clock),
            organizer_tokens: self.organizer_tokens.clone(),
            admin_tokens: self.admin_tokens.clone(),
            mail: Arc::clone(&self.mail),
        }
    }
}

impl<S, C, M> std::fmt::Debug for FestivalApp<S, C, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FestivalApp")
            .field("events", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl<S, C, M> FestivalApp<S, C, M> {
    /// Assemble the application.
    ///
    /// Organizer and admin tokens are signed with the separate secrets of
    /// `auth`.
    #[must_use]
    pub fn new(
        registry: EventRegistry,
        store: S,
        credentials: C,
        mailer: M,
        clock: Arc<dyn Clock>,
        auth: &AuthConfig,
        mail: MailConfig,
    ) -> Self {
        let organizer_secret = auth.eo_jwt_secret.as_bytes();
        let admin_secret = auth.admin_jwt_secret.as_bytes();
        Self {
            registry: Arc::new(registry),
            store: Arc::new(store),
            credentials: Arc::new(credentials),
            mailer: Arc::new(mailer),
            organizer_tokens: SessionTokens::new(organizer_secret, Arc::clone(&clock)),
            admin_tokens: SessionTokens::new(admin_secret, Arc::clone(&clock)),
            clock,
            mail: Arc::new(mail),
        }
    }

    /// Resolve the event owning `table`.
    fn event_for_table(&self, table: &str) -> Result<&EventDefinition, FestivalError> {
        self.registry
            .by_table(table)
            .ok_or_else(|| FestivalError::UnknownTable(table.to_string()))
    }
}
