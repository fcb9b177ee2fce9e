//! Registration listings for the dashboards.

use super::error::persistence;
use super::{FestivalApp, PipelineError};
use festival_auth::{CredentialStore, OrganizerClaims};
use festival_core::{FestivalError, Mailer, Registration, RegistrationStore};
use serde::Serialize;
use tracing::warn;

/// Which events an admin listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// Every configured event.
    All,
    /// One event by id.
    Event(String),
}

impl EventFilter {
    /// Parse the `event` query parameter; absent or `all` means every event.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | "all") => Self::All,
            Some(id) => Self::Event(id.to_string()),
        }
    }
}

/// A registration row, annotated with its event in cross-event listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedRegistration {
    /// The row.
    #[serde(flatten)]
    pub registration: Registration,
    /// Event id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Event display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    /// Table the row lives in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl From<Registration> for ListedRegistration {
    fn from(registration: Registration) -> Self {
        Self {
            registration,
            event_id: None,
            event_name: None,
            table_name: None,
        }
    }
}

impl<S, C, M> FestivalApp<S, C, M>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    /// Registrations of the organizer's own event, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the session's table is not configured or the query
    /// fails.
    #[tracing::instrument(skip(self, organizer), fields(event = %organizer.event_id))]
    pub async fn organizer_registrations(
        &self,
        organizer: &OrganizerClaims,
    ) -> Result<Vec<Registration>, PipelineError> {
        let event = self.event_for_table(&organizer.table_name)?;
        self.store
            .list(&event.table_name)
            .await
            .map_err(persistence("Failed to fetch registrations"))
    }

    /// Registrations for the admin dashboard, newest first.
    ///
    /// With [`EventFilter::All`] rows are annotated with their event and a
    /// table that cannot be read is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns error if a single requested event does not exist or its
    /// query fails.
    #[tracing::instrument(skip(self))]
    pub async fn admin_registrations(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<ListedRegistration>, PipelineError> {
        match filter {
            EventFilter::Event(id) => {
                let event = self
                    .registry
                    .get(id)
                    .ok_or_else(|| FestivalError::InvalidEvent(id.clone()))?;
                let rows = self
                    .store
                    .list(&event.table_name)
                    .await
                    .map_err(persistence("Failed to fetch registrations"))?;
                Ok(rows.into_iter().map(ListedRegistration::from).collect())
            }
            EventFilter::All => {
                let mut listed = Vec::new();
                for event in self.registry.iter() {
                    match self.store.list(&event.table_name).await {
                        Ok(rows) => listed.extend(rows.into_iter().map(|registration| {
                            ListedRegistration {
                                registration,
                                event_id: Some(event.id.clone()),
                                event_name: Some(event.name.clone()),
                                table_name: Some(event.table_name.clone()),
                            }
                        })),
                        Err(e) => {
                            warn!(table = %event.table_name, error = %e, "skipping unreadable table");
                        }
                    }
                }
                listed.sort_by(|a, b| b.registration.created_at.cmp(&a.registration.created_at));
                Ok(listed)
            }
        }
    }
}
