//! Registration pipeline.
//!
//! validate → duplicate check → roster bounds → insert → QR → email → flags.
//! Everything up to the insert can reject the submission; everything after
//! it is best-effort.

use super::error::persistence;
use super::{FestivalApp, PipelineError};
use crate::mail::{confirmation_email, qr_image};
use crate::{metrics, qr};
use festival_auth::CredentialStore;
use festival_core::{
    EventDefinition, FestivalError, Mailer, Registration, RegistrationForm, RegistrationStore,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    /// Generated registration id.
    pub registration_id: Uuid,
    /// Confirmation shown to the participant.
    pub message: String,
    /// Whether the confirmation email went out.
    pub email_sent: bool,
}

impl<S, C, M> FestivalApp<S, C, M>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    /// Register a participant or team for `event_id`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The event does not exist
    /// - A field is missing or malformed
    /// - The email is already registered for this event
    /// - The roster is outside the event's bounds
    /// - The insert fails
    ///
    /// QR and email failures are logged and do not fail the registration.
    #[tracing::instrument(skip(self, form), fields(event = %event_id))]
    pub async fn register(
        &self,
        event_id: &str,
        form: RegistrationForm,
    ) -> Result<Registered, PipelineError> {
        let result = self.run_registration(event_id, form).await;

        let outcome = match &result {
            Ok(_) => "created",
            Err(PipelineError::Domain(FestivalError::AlreadyRegistered)) => "duplicate",
            Err(err) if err.is_user_error() => "rejected",
            Err(_) => "failed",
        };
        let label = if self.registry.get(event_id).is_some() {
            event_id
        } else {
            "unknown"
        };
        metrics::record_registration(label, outcome);

        result
    }

    async fn run_registration(
        &self,
        event_id: &str,
        form: RegistrationForm,
    ) -> Result<Registered, PipelineError> {
        let event = self
            .registry
            .get(event_id)
            .ok_or_else(|| FestivalError::InvalidEvent(event_id.to_string()))?;

        form.validate_fields(event)?;

        let email = form
            .normalized_email()
            .ok_or_else(|| FestivalError::validation("Email is required"))?;
        if self
            .store
            .email_exists(&event.table_name, &email)
            .await
            .map_err(persistence("Failed to check existing registrations"))?
        {
            return Err(FestivalError::AlreadyRegistered.into());
        }

        form.validate_team_size(event)?;

        let new = form.into_new_registration(event, self.clock.now())?;
        let registration = self
            .store
            .insert(&event.table_name, &new)
            .await
            .map_err(|source| {
                tracing::error!(error = %source, table = %event.table_name, "registration insert failed");
                PipelineError::persistence("Failed to create registration", source)
            })?;

        info!(registration_id = %registration.id, kind = event.kind.label(), "registration created");

        let email_sent = self.deliver_confirmation(event, &registration).await;
        let message = if email_sent {
            format!(
                "Registration successful! A confirmation email with your QR code has been sent to {}.",
                registration.email
            )
        } else {
            "Registration successful! Please keep your registration ID; the confirmation email could not be sent."
                .to_string()
        };

        Ok(Registered {
            registration_id: registration.id,
            message,
            email_sent,
        })
    }

    /// Render the QR code, send the confirmation and set the delivery flags.
    ///
    /// Returns whether the email was sent.
    async fn deliver_confirmation(&self, event: &EventDefinition, registration: &Registration) -> bool {
        let png = match qr::encode(registration.id.to_string()).await {
            Ok(png) => png,
            Err(e) => {
                warn!(registration_id = %registration.id, error = %e, "QR generation failed, skipping confirmation email");
                metrics::record_email("confirmation", false);
                return false;
            }
        };

        let sent = match confirmation_email(
            event,
            registration,
            Some(qr_image(registration, png)),
            &self.mail,
        ) {
            Ok(email) => self.mailer.send(email).await,
            Err(e) => Err(e),
        };
        if let Err(e) = sent {
            warn!(registration_id = %registration.id, error = %e, "confirmation email failed");
            metrics::record_email("confirmation", false);
            return false;
        }
        metrics::record_email("confirmation", true);

        if let Err(e) = self
            .store
            .mark_delivered(&event.table_name, registration.id)
            .await
        {
            warn!(registration_id = %registration.id, error = %e, "failed to record email delivery");
        }
        true
    }
}
