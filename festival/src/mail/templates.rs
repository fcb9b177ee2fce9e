//! HTML email templates.
//!
//! One confirmation layout per event kind and four status notices, rendered
//! by askama from `templates/email/`. Interpolated values are HTML-escaped
//! by the template engine.

use crate::config::MailConfig;
use askama::Template;
use festival_core::{
    EmbeddedImage, EventDefinition, EventKind, MailError, OutboundEmail, Registration,
    RegistrationStatus,
};

/// Content id of the inline QR image.
pub const QR_CONTENT_ID: &str = "registration-qr";

/// Wrap PNG bytes as the inline QR image.
#[must_use]
pub fn qr_image(registration: &Registration, png: Vec<u8>) -> EmbeddedImage {
    EmbeddedImage {
        content_id: QR_CONTENT_ID.to_string(),
        filename: format!("registration-{}.png", registration.id),
        content_type: "image/png".to_string(),
        bytes: png,
    }
}

struct ConfirmationPage<'a> {
    title: String,
    festival_name: &'a str,
    event_name: &'a str,
    registration: &'a Registration,
    team_size: Option<usize>,
    venue: Option<&'a str>,
    qr_content_id: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "email/confirmation_solo.html")]
struct SoloConfirmation<'a> {
    page: ConfirmationPage<'a>,
}

#[derive(Template)]
#[template(path = "email/confirmation_team.html")]
struct TeamConfirmation<'a> {
    page: ConfirmationPage<'a>,
}

#[derive(Template)]
#[template(path = "email/confirmation_street_play.html")]
struct StreetPlayConfirmation<'a> {
    page: ConfirmationPage<'a>,
}

#[derive(Template)]
#[template(path = "email/confirmation_multi_event.html")]
struct MultiEventConfirmation<'a> {
    page: ConfirmationPage<'a>,
}

fn render(template: &impl Template) -> Result<String, MailError> {
    template
        .render()
        .map_err(|e| MailError::Build(e.to_string()))
}

/// Build the confirmation email for a new registration.
///
/// The QR image, when present, is shown inline and attached.
///
/// # Errors
///
/// Returns [`MailError::Build`] if the template fails to render.
pub fn confirmation_email(
    event: &EventDefinition,
    registration: &Registration,
    qr: Option<EmbeddedImage>,
    mail: &MailConfig,
) -> Result<OutboundEmail, MailError> {
    let team_size = matches!(event.kind, EventKind::Team { .. } | EventKind::StreetPlay { .. })
        .then(|| registration.team_size());
    let page = ConfirmationPage {
        title: format!("{} registration", event.name),
        festival_name: &mail.festival_name,
        event_name: &event.name,
        registration,
        team_size,
        venue: event.venue.as_deref(),
        qr_content_id: qr.as_ref().map(|image| image.content_id.as_str()),
    };
    let html = match &event.kind {
        EventKind::Solo => render(&SoloConfirmation { page })?,
        EventKind::Team { .. } => render(&TeamConfirmation { page })?,
        EventKind::StreetPlay { .. } => render(&StreetPlayConfirmation { page })?,
        EventKind::MultiEvent { .. } => render(&MultiEventConfirmation { page })?,
    };

    Ok(OutboundEmail {
        from: event.sender.clone(),
        to: registration.email.clone(),
        cc: vec![mail.organizer_cc.clone()],
        subject: format!("Registration received: {} | {}", event.name, mail.festival_name),
        html,
        images: qr.into_iter().collect(),
    })
}

/// Status notice variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusNotice {
    /// Registration cancelled.
    Cancelled,
    /// Registration verified and payment confirmed.
    Confirmed,
    /// Payment could not be verified yet.
    PaymentPending,
    /// Any other change.
    Updated,
}

impl StatusNotice {
    /// Pick the notice for a status change.
    #[must_use]
    pub const fn for_change(status: RegistrationStatus, payment_verified: bool) -> Self {
        match (status, payment_verified) {
            (RegistrationStatus::Cancelled, _) => Self::Cancelled,
            (RegistrationStatus::Verified, true) => Self::Confirmed,
            (_, false) => Self::PaymentPending,
            (RegistrationStatus::Pending, true) => Self::Updated,
        }
    }

    /// Label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Confirmed => "confirmed",
            Self::PaymentPending => "payment_pending",
            Self::Updated => "updated",
        }
    }
}

/// Inputs of a status notice.
#[derive(Debug, Clone)]
pub struct StatusEmail<'a> {
    /// Event the registration belongs to.
    pub event: &'a EventDefinition,
    /// Recipient address.
    pub recipient: &'a str,
    /// Participant name, if known.
    pub participant: Option<&'a str>,
    /// Registration id.
    pub registration_id: &'a str,
    /// New status.
    pub status: RegistrationStatus,
    /// New payment flag.
    pub payment_verified: bool,
    /// Free-text message from the admin.
    pub message: Option<&'a str>,
}

struct StatusPage<'a> {
    title: &'static str,
    festival_name: &'a str,
    event_name: &'a str,
    participant: &'a str,
    registration_id: &'a str,
    status: RegistrationStatus,
    message: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "email/status_cancelled.html")]
struct CancelledNotice<'a> {
    page: StatusPage<'a>,
}

#[derive(Template)]
#[template(path = "email/status_confirmed.html")]
struct ConfirmedNotice<'a> {
    page: StatusPage<'a>,
}

#[derive(Template)]
#[template(path = "email/status_payment_pending.html")]
struct PaymentPendingNotice<'a> {
    page: StatusPage<'a>,
}

#[derive(Template)]
#[template(path = "email/status_updated.html")]
struct UpdatedNotice<'a> {
    page: StatusPage<'a>,
}

/// Build a status notice.
///
/// # Errors
///
/// Returns [`MailError::Build`] if the template fails to render.
pub fn status_email(notice: &StatusEmail<'_>, mail: &MailConfig) -> Result<OutboundEmail, MailError> {
    let kind = StatusNotice::for_change(notice.status, notice.payment_verified);
    let (subject, title) = match kind {
        StatusNotice::Cancelled => ("Registration cancelled", "Registration cancelled"),
        StatusNotice::Confirmed => ("Registration confirmed", "Registration confirmed"),
        StatusNotice::PaymentPending => ("Payment verification pending", "Payment not yet verified"),
        StatusNotice::Updated => ("Registration update", "Registration updated"),
    };
    let page = StatusPage {
        title,
        festival_name: &mail.festival_name,
        event_name: &notice.event.name,
        participant: notice.participant.unwrap_or("participant"),
        registration_id: notice.registration_id,
        status: notice.status,
        message: notice.message.map(str::trim).filter(|m| !m.is_empty()),
    };
    let html = match kind {
        StatusNotice::Cancelled => render(&CancelledNotice { page })?,
        StatusNotice::Confirmed => render(&ConfirmedNotice { page })?,
        StatusNotice::PaymentPending => render(&PaymentPendingNotice { page })?,
        StatusNotice::Updated => render(&UpdatedNotice { page })?,
    };

    Ok(OutboundEmail {
        from: mail.notifications_from.clone(),
        to: notice.recipient.to_string(),
        cc: Vec::new(),
        subject: format!("{subject}: {} | {}", notice.event.name, mail.festival_name),
        html,
        images: Vec::new(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use festival_core::{EventRegistry, Registration};
    use festival_testing::{fixtures, test_clock};
    use festival_core::Clock;
    use uuid::Uuid;

    fn mail() -> MailConfig {
        MailConfig {
            organizer_cc: "cc@festival.example.edu".into(),
            festival_name: "Fest".into(),
            notifications_from: "noreply@festival.example.edu".into(),
        }
    }

    fn registration(event_id: &str, form: festival_core::RegistrationForm) -> (EventDefinition, Registration) {
        let registry = EventRegistry::builtin();
        let event = registry.get(event_id).unwrap().clone();
        let new = form.into_new_registration(&event, test_clock().now()).unwrap();
        (event, Registration::from_new(Uuid::new_v4(), new))
    }

    #[test]
    fn test_confirmation_embeds_qr_and_copies_organizers() {
        let (event, row) = registration("solo-singing", fixtures::solo_form("singer@example.com"));
        let qr = qr_image(&row, vec![1, 2, 3]);
        let email = confirmation_email(&event, &row, Some(qr), &mail()).unwrap();

        assert_eq!(email.from, event.sender);
        assert_eq!(email.to, "singer@example.com");
        assert_eq!(email.cc, vec!["cc@festival.example.edu".to_string()]);
        assert!(email.html.contains("cid:registration-qr"));
        assert!(email.html.contains(&row.id.to_string()));
        assert_eq!(email.images.len(), 1);
    }

    #[test]
    fn test_confirmation_without_qr_has_no_image_reference() {
        let (event, row) = registration("hackathon", fixtures::hackathon_form("lead@example.com", 2));
        let email = confirmation_email(&event, &row, None, &mail()).unwrap();
        assert!(!email.html.contains("cid:"));
        assert!(email.html.contains("Team members"));
        assert!(email.images.is_empty());
    }

    #[test]
    fn test_multi_event_lists_selected_sub_events() {
        let (event, row) = registration(
            "cultural-fest",
            fixtures::cultural_fest_form("dancer@example.com", &["solo-dance", "poetry"]),
        );
        let email = confirmation_email(&event, &row, None, &mail()).unwrap();
        for selection in &row.details.sub_events {
            assert!(email.html.contains(&selection.name));
        }
    }

    #[test]
    fn test_status_notice_variants() {
        use RegistrationStatus::{Cancelled, Pending, Verified};
        assert_eq!(StatusNotice::for_change(Cancelled, true), StatusNotice::Cancelled);
        assert_eq!(StatusNotice::for_change(Verified, true), StatusNotice::Confirmed);
        assert_eq!(StatusNotice::for_change(Verified, false), StatusNotice::PaymentPending);
        assert_eq!(StatusNotice::for_change(Pending, false), StatusNotice::PaymentPending);
        assert_eq!(StatusNotice::for_change(Pending, true), StatusNotice::Updated);
    }

    #[test]
    fn test_status_email_includes_escaped_admin_message() {
        let registry = EventRegistry::builtin();
        let email = status_email(
            &StatusEmail {
                event: registry.get("street-play").unwrap(),
                recipient: "troupe@example.com",
                participant: Some("Asha"),
                registration_id: "abc",
                status: RegistrationStatus::Verified,
                payment_verified: true,
                message: Some("See you at <Main Stage>"),
            },
            &mail(),
        )
        .unwrap();
        assert!(email.subject.starts_with("Registration confirmed"));
        assert!(email.html.contains("See you at &lt;Main Stage&gt;"));
        assert_eq!(email.to, "troupe@example.com");
    }

    #[test]
    fn test_participant_text_is_escaped() {
        let mut form = fixtures::street_play_form("troupe@example.com", 3, "123456789012");
        form.name = Some("Meera <b>Iyer</b>".into());
        form.team_name = Some("Tom & Jerry".into());
        form.synopsis = Some("<script>alert(1)</script>".into());
        let (event, row) = registration("street-play", form);

        let email = confirmation_email(&event, &row, None, &mail()).unwrap();
        assert!(email.html.contains("Meera &lt;b&gt;Iyer&lt;/b&gt;"));
        assert!(email.html.contains("Tom &amp; Jerry"));
        assert!(email.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("<h3>Synopsis</h3>"));
    }

    #[test]
    fn test_status_update_notice_names_new_status() {
        let registry = EventRegistry::builtin();
        let email = status_email(
            &StatusEmail {
                event: registry.get("hackathon").unwrap(),
                recipient: "lead@example.com",
                participant: None,
                registration_id: "abc",
                status: RegistrationStatus::Pending,
                payment_verified: true,
                message: Some("   "),
            },
            &mail(),
        )
        .unwrap();
        assert!(email.subject.starts_with("Registration update: 24h Hackathon"));
        assert!(email.html.contains("Dear participant,"));
        assert!(email.html.contains("<strong>pending</strong>"));
        assert!(!email.html.contains("Message from the organizers"));
    }
}
