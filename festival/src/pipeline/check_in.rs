//! Venue check-in by organizers.

use super::error::persistence;
use super::{FestivalApp, PipelineError};
use crate::metrics;
use festival_auth::{CredentialStore, OrganizerClaims};
use festival_core::{Mailer, Registration, RegistrationStore};
use tracing::info;
use uuid::Uuid;

/// Result of a check-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// The registration is now checked in; carries the updated row.
    CheckedIn(Registration),
    /// The registration was already checked in; nothing was written.
    AlreadyCheckedIn(Registration),
    /// No registration with this id in the organizer's table.
    NotFound,
}

impl CheckInOutcome {
    const fn label(&self) -> &'static str {
        match self {
            Self::CheckedIn(_) => "checked_in",
            Self::AlreadyCheckedIn(_) => "already_checked_in",
            Self::NotFound => "not_found",
        }
    }
}

impl<S, C, M> FestivalApp<S, C, M>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    /// Check in a registration of the organizer's own event.
    ///
    /// The table comes from the session, so an organizer can never touch
    /// another event's registrations. Read then write, without a lock: two
    /// concurrent check-ins of one id may both write, which sets the same
    /// flag twice.
    ///
    /// # Errors
    ///
    /// Returns error if the session's table is not configured or a storage
    /// call fails.
    #[tracing::instrument(skip(self, organizer), fields(event = %organizer.event_id))]
    pub async fn check_in(
        &self,
        organizer: &OrganizerClaims,
        registration_id: &str,
    ) -> Result<CheckInOutcome, PipelineError> {
        let outcome = self.run_check_in(organizer, registration_id).await;
        if let Ok(outcome) = &outcome {
            metrics::record_check_in(outcome.label());
        }
        outcome
    }

    async fn run_check_in(
        &self,
        organizer: &OrganizerClaims,
        registration_id: &str,
    ) -> Result<CheckInOutcome, PipelineError> {
        let table = &self.event_for_table(&organizer.table_name)?.table_name;
        let Ok(id) = Uuid::parse_str(registration_id.trim()) else {
            return Ok(CheckInOutcome::NotFound);
        };

        let Some(existing) = self
            .store
            .find(table, id)
            .await
            .map_err(persistence("Failed to load registration"))?
        else {
            return Ok(CheckInOutcome::NotFound);
        };
        if existing.checked_in {
            return Ok(CheckInOutcome::AlreadyCheckedIn(existing));
        }

        if !self
            .store
            .mark_checked_in(table, id, self.clock.now())
            .await
            .map_err(persistence("Failed to check in"))?
        {
            return Ok(CheckInOutcome::NotFound);
        }

        let updated = self
            .store
            .find(table, id)
            .await
            .map_err(persistence("Failed to load registration"))?;
        info!(registration_id = %id, "checked in");
        Ok(updated.map_or(CheckInOutcome::NotFound, CheckInOutcome::CheckedIn))
    }
}
