//! Admin status updates and the optional notice to the participant.

use super::error::persistence;
use super::{FestivalApp, PipelineError};
use crate::mail::{status_email, StatusEmail, StatusNotice};
use crate::metrics;
use festival_auth::{AdminClaims, CredentialStore};
use festival_core::{FestivalError, Mailer, RegistrationStatus, RegistrationStore, StatusChange};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Status update submitted from the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Registration to update.
    pub registration_id: String,
    /// Table the registration lives in.
    pub table_name: String,
    /// New verification state.
    pub registration_status: RegistrationStatus,
    /// New payment flag.
    #[serde(default)]
    pub payment_verified: bool,
    /// Message included in the notice.
    #[serde(default)]
    pub message: Option<String>,
    /// Notice recipient; no email is sent when absent.
    #[serde(default, alias = "email")]
    pub recipient: Option<String>,
}

/// Result of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdated {
    /// Whether a notice went out.
    pub email_sent: bool,
}

impl<S, C, M> FestivalApp<S, C, M>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    /// Apply an admin status change and notify the participant.
    ///
    /// The admin claims are only used for the audit log; holding them is
    /// what authorizes the call.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The table does not belong to a configured event
    /// - No registration has this id
    /// - The update fails
    ///
    /// A failed notice is logged and does not fail the update.
    #[tracing::instrument(
        skip(self, admin, update),
        fields(admin = %admin.username, table = %update.table_name, status = %update.registration_status)
    )]
    pub async fn update_status(
        &self,
        admin: &AdminClaims,
        update: StatusUpdate,
    ) -> Result<StatusUpdated, PipelineError> {
        let event = self.event_for_table(&update.table_name)?;
        let id = Uuid::parse_str(update.registration_id.trim()).map_err(|_| FestivalError::NotFound)?;

        let change = StatusChange {
            registration_status: update.registration_status,
            payment_verified: update.payment_verified,
        };
        let updated = self
            .store
            .update_status(&event.table_name, id, change, self.clock.now())
            .await
            .map_err(persistence("Failed to update registration"))?;
        if !updated {
            return Err(FestivalError::NotFound.into());
        }
        info!(registration_id = %id, payment_verified = change.payment_verified, "registration status updated");

        let Some(recipient) = update
            .recipient
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
        else {
            return Ok(StatusUpdated { email_sent: false });
        };

        let participant = match self.store.find(&event.table_name, id).await {
            Ok(row) => row.map(|r| r.name),
            Err(e) => {
                warn!(registration_id = %id, error = %e, "could not load participant name for notice");
                None
            }
        };
        let registration_id = id.to_string();
        let delivery = match status_email(
            &StatusEmail {
                event,
                recipient,
                participant: participant.as_deref(),
                registration_id: &registration_id,
                status: change.registration_status,
                payment_verified: change.payment_verified,
                message: update.message.as_deref(),
            },
            &self.mail,
        ) {
            Ok(email) => self.mailer.send(email).await,
            Err(e) => Err(e),
        };

        let notice = StatusNotice::for_change(change.registration_status, change.payment_verified);
        let email_sent = match delivery {
            Ok(()) => {
                info!(registration_id = %id, notice = notice.as_str(), "status notice sent");
                true
            }
            Err(e) => {
                warn!(registration_id = %id, notice = notice.as_str(), error = %e, "status notice failed");
                false
            }
        };
        metrics::record_email("status", email_sent);

        Ok(StatusUpdated { email_sent })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{app, Harness};
    use chrono::Duration;
    use festival_testing::fixtures::solo_form;

    const TABLE: &str = "solo_singing_registrations";

    fn admin() -> AdminClaims {
        AdminClaims {
            admin_id: 1,
            username: "root".into(),
            role: "super_admin".into(),
        }
    }

    fn update(id: Uuid, status: RegistrationStatus, paid: bool) -> StatusUpdate {
        StatusUpdate {
            registration_id: id.to_string(),
            table_name: TABLE.into(),
            registration_status: status,
            payment_verified: paid,
            message: None,
            recipient: None,
        }
    }

    #[tokio::test]
    async fn test_update_without_recipient_sends_nothing() {
        let Harness { app, store, mailer, clock, .. } = app();
        let id = app
            .register("solo-singing", solo_form("asha@example.com"))
            .await
            .unwrap()
            .registration_id;
        clock.advance(Duration::minutes(30));

        let result = app
            .update_status(&admin(), update(id, RegistrationStatus::Verified, true))
            .await
            .unwrap();
        assert!(!result.email_sent);

        let row = &store.rows(TABLE)[0];
        assert_eq!(row.registration_status, RegistrationStatus::Verified);
        assert!(row.payment_verified);
        assert_eq!(row.updated_at, row.created_at + Duration::minutes(30));
        assert_eq!(mailer.sent().len(), 1); // confirmation only
    }

    #[tokio::test]
    async fn test_cancellation_notice_carries_admin_message() {
        let Harness { app, mailer, .. } = app();
        let id = app
            .register("solo-singing", solo_form("asha@example.com"))
            .await
            .unwrap()
            .registration_id;

        let mut cancel = update(id, RegistrationStatus::Cancelled, false);
        cancel.recipient = Some("asha@example.com".into());
        cancel.message = Some("Duplicate <entry>".into());
        let result = app.update_status(&admin(), cancel).await.unwrap();
        assert!(result.email_sent);

        let notice = mailer.sent().pop().unwrap();
        assert_eq!(notice.to, "asha@example.com");
        assert_eq!(notice.from, "registrations@festival.example.edu");
        assert!(notice.subject.starts_with("Registration cancelled"));
        assert!(notice.html.contains("Asha Rao"));
        assert!(notice.html.contains("Duplicate &lt;entry&gt;"));
    }

    #[tokio::test]
    async fn test_notice_failure_keeps_update() {
        let Harness { app, store, mailer, .. } = app();
        let id = app
            .register("solo-singing", solo_form("asha@example.com"))
            .await
            .unwrap()
            .registration_id;
        mailer.set_failing(true);

        let mut verify = update(id, RegistrationStatus::Verified, true);
        verify.recipient = Some("asha@example.com".into());
        let result = app.update_status(&admin(), verify).await.unwrap();

        assert!(!result.email_sent);
        assert_eq!(store.rows(TABLE)[0].registration_status, RegistrationStatus::Verified);
    }

    #[tokio::test]
    async fn test_unknown_table_and_missing_row() {
        let Harness { app, store, .. } = app();

        let mut foreign = update(Uuid::new_v4(), RegistrationStatus::Verified, true);
        foreign.table_name = "eo_auth".into();
        let err = app.update_status(&admin(), foreign).await.unwrap_err();
        assert!(matches!(err, PipelineError::Domain(FestivalError::UnknownTable(_))));

        let err = app
            .update_status(&admin(), update(Uuid::new_v4(), RegistrationStatus::Verified, true))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Domain(FestivalError::NotFound)));

        let mut garbled = update(Uuid::new_v4(), RegistrationStatus::Verified, true);
        garbled.registration_id = "not-a-uuid".into();
        let err = app.update_status(&admin(), garbled).await.unwrap_err();
        assert!(matches!(err, PipelineError::Domain(FestivalError::NotFound)));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_request_body_is_camel_case() {
        let update: StatusUpdate = serde_json::from_value(serde_json::json!({
            "registrationId": "5f0c1c8e-8f5e-4b8a-9d57-0e1c2b3a4d5e",
            "tableName": "hackathon_registrations",
            "registrationStatus": "verified",
            "paymentVerified": true,
            "email": "lead@example.com",
        }))
        .unwrap();
        assert_eq!(update.registration_status, RegistrationStatus::Verified);
        assert_eq!(update.recipient.as_deref(), Some("lead@example.com"));
        assert!(update.message.is_none());
    }
}
