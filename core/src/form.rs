//! Submitted registration forms and their per-event validation.
//!
//! Field names follow the public registration forms (`team_leader_email`,
//! `team_size`, `utr_number`); camelCase spellings are accepted as aliases.

use crate::error::{FestivalError, Result};
use crate::event::{EventDefinition, EventKind, SubEvent, TeamBounds};
use crate::registration::{NewRegistration, RegistrationDetails, SubEventSelection, TeamMember};
use crate::validation::{is_valid_email, is_valid_utr, normalize_phone};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// A sub-event requested in a multi-event submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubEventRequest {
    /// Sub-event id from the catalog.
    #[serde(alias = "sub_event_id", alias = "subEventId")]
    pub id: String,
    /// Additional members for team sub-events.
    #[serde(default, alias = "team_members", alias = "teamMembers")]
    pub members: Vec<TeamMember>,
}

/// Raw registration submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationForm {
    /// Participant or team leader name.
    #[serde(
        default,
        alias = "team_leader_name",
        alias = "teamLeaderName",
        alias = "participant_name",
        alias = "participantName"
    )]
    pub name: Option<String>,
    /// Participant or team leader email.
    #[serde(
        default,
        alias = "team_leader_email",
        alias = "teamLeaderEmail",
        alias = "participant_email",
        alias = "participantEmail"
    )]
    pub email: Option<String>,
    /// Participant or team leader phone.
    #[serde(
        default,
        alias = "team_leader_phone",
        alias = "teamLeaderPhone",
        alias = "participant_phone",
        alias = "participantPhone"
    )]
    pub phone: Option<String>,
    /// College or institution.
    #[serde(default)]
    pub college: Option<String>,
    /// Team name.
    #[serde(default, alias = "teamName")]
    pub team_name: Option<String>,
    /// Declared team size including the leader.
    #[serde(default, alias = "teamSize")]
    pub team_size: Option<u32>,
    /// Members besides the leader.
    #[serde(default, alias = "team_members", alias = "teamMembers")]
    pub members: Vec<TeamMember>,
    /// Street play synopsis.
    #[serde(default)]
    pub synopsis: Option<String>,
    /// Bank transaction reference.
    #[serde(default, alias = "utr", alias = "utrNumber")]
    pub utr_number: Option<String>,
    /// Amount the participant reports as paid.
    #[serde(default, alias = "amountPaid")]
    pub amount_paid: Option<i64>,
    /// Proof-of-payment flag set by the form.
    #[serde(default, alias = "paymentProof")]
    pub payment_proof: Option<bool>,
    /// Custom questionnaire answers.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    /// Requested sub-events (multi-event only).
    #[serde(default, alias = "subEvents")]
    pub sub_events: Vec<SubEventRequest>,
}

impl RegistrationForm {
    /// Normalized email used for duplicate detection and storage.
    #[must_use]
    pub fn normalized_email(&self) -> Option<String> {
        present(self.email.as_ref()).map(str::to_lowercase)
    }

    /// Validate identity and event-specific fields.
    ///
    /// Team-size bounds are checked separately by
    /// [`validate_team_size`](Self::validate_team_size), after the duplicate
    /// check.
    ///
    /// # Errors
    ///
    /// Returns [`FestivalError::Validation`] naming the first missing or
    /// malformed field.
    pub fn validate_fields(&self, event: &EventDefinition) -> Result<()> {
        let (name, email, phone) = (
            present(self.name.as_ref()),
            present(self.email.as_ref()),
            present(self.phone.as_ref()),
        );
        if name.is_none() || email.is_none() || phone.is_none() {
            return Err(FestivalError::validation(
                "Name, email and phone are required",
            ));
        }
        if !email.is_some_and(is_valid_email) {
            return Err(FestivalError::validation(
                "Please provide a valid email address",
            ));
        }
        if phone.and_then(normalize_phone).is_none() {
            return Err(FestivalError::validation(
                "Please provide a valid 10-digit phone number",
            ));
        }

        match &event.kind {
            EventKind::Solo => {}
            EventKind::Team { .. } => {
                self.require_team_name()?;
                validate_members(&self.members)?;
            }
            EventKind::StreetPlay { .. } => {
                self.require_team_name()?;
                if present(self.synopsis.as_ref()).is_none() {
                    return Err(FestivalError::validation(
                        "Please provide a synopsis of the play",
                    ));
                }
                validate_members(&self.members)?;
            }
            EventKind::MultiEvent { .. } => {
                self.resolve_sub_events(event)?;
                for request in &self.sub_events {
                    validate_members(&request.members)?;
                }
            }
        }

        if self.amount_paid.is_some_and(|amount| amount < 0) {
            return Err(FestivalError::validation("Amount paid cannot be negative"));
        }

        if event.requires_payment_proof
            && self.total_amount(event)? > 0
            && !present(self.utr_number.as_ref()).is_some_and(is_valid_utr)
        {
            return Err(FestivalError::validation(
                "Please provide a valid 12-digit UTR number",
            ));
        }

        Ok(())
    }

    /// Check roster sizes against the event's (or sub-events') bounds.
    ///
    /// The roster is the listed members plus the leader. When no members are
    /// listed the declared `team_size` is used instead; when both are given
    /// they must agree.
    ///
    /// # Errors
    ///
    /// Returns [`FestivalError::Validation`] when a roster is outside its
    /// half-open bound.
    pub fn validate_team_size(&self, event: &EventDefinition) -> Result<()> {
        match &event.kind {
            EventKind::Team { bounds } | EventKind::StreetPlay { bounds } => {
                let additional = self.additional_members()?;
                check_roster(bounds, additional, "Team")
            }
            EventKind::MultiEvent { .. } => {
                for (request, sub) in self.sub_events.iter().zip(self.resolve_sub_events(event)?) {
                    if let Some(bounds) = &sub.team {
                        let additional = u32::try_from(request.members.len()).unwrap_or(u32::MAX);
                        check_roster(bounds, additional, &sub.name)?;
                    }
                }
                Ok(())
            }
            EventKind::Solo => Ok(()),
        }
    }

    /// Total amount due for this submission.
    ///
    /// # Errors
    ///
    /// Returns [`FestivalError::Validation`] if a requested sub-event does
    /// not exist.
    pub fn total_amount(&self, event: &EventDefinition) -> Result<i64> {
        match &event.kind {
            EventKind::MultiEvent { .. } => Ok(self
                .resolve_sub_events(event)?
                .iter()
                .map(|sub| sub.fee)
                .sum()),
            _ => Ok(event.fee),
        }
    }

    /// Convert a validated form into a row ready for insertion.
    ///
    /// # Errors
    ///
    /// Returns [`FestivalError::Validation`] if the form has not passed
    /// [`validate_fields`](Self::validate_fields).
    pub fn into_new_registration(
        self,
        event: &EventDefinition,
        now: DateTime<Utc>,
    ) -> Result<NewRegistration> {
        let total_amount = self.total_amount(event)?;
        let amount_paid = self.amount_paid.unwrap_or(total_amount);

        let sub_events = self
            .resolve_sub_events(event)?
            .into_iter()
            .zip(&self.sub_events)
            .map(|(sub, request)| SubEventSelection {
                sub_event_id: sub.id.clone(),
                name: sub.name.clone(),
                fee: sub.fee,
                members: request.members.clone(),
            })
            .collect();

        let name = present(self.name.as_ref())
            .map(str::to_string)
            .ok_or_else(|| FestivalError::validation("Name is required"))?;
        let email = self
            .normalized_email()
            .ok_or_else(|| FestivalError::validation("Email is required"))?;
        let phone = present(self.phone.as_ref())
            .and_then(normalize_phone)
            .ok_or_else(|| FestivalError::validation("Phone is required"))?;
        let utr_number = present(self.utr_number.as_ref()).map(str::to_string);
        let payment_proof = self.payment_proof.unwrap_or(false) || utr_number.is_some();

        let team_size = match event.kind {
            EventKind::Team { .. } | EventKind::StreetPlay { .. } => {
                Some(self.additional_members()?.saturating_add(1))
            }
            _ => None,
        };
        let synopsis = match event.kind {
            EventKind::StreetPlay { .. } => present(self.synopsis.as_ref()).map(str::to_string),
            _ => None,
        };

        Ok(NewRegistration {
            name,
            email,
            phone,
            college: present(self.college.as_ref()).map(str::to_string),
            team_name: present(self.team_name.as_ref()).map(str::to_string),
            details: RegistrationDetails {
                members: self.members,
                team_size,
                synopsis,
                answers: self.answers,
                sub_events,
            },
            total_amount,
            amount_paid,
            utr_number,
            payment_proof,
            created_at: now,
        })
    }

    fn require_team_name(&self) -> Result<()> {
        if present(self.team_name.as_ref()).is_none() {
            return Err(FestivalError::validation("Team name is required"));
        }
        Ok(())
    }

    fn additional_members(&self) -> Result<u32> {
        let listed = u32::try_from(self.members.len()).unwrap_or(u32::MAX);
        match self.team_size {
            None => Ok(listed),
            Some(0) => Err(FestivalError::validation("Team size must be at least 1")),
            Some(size) if listed == 0 => Ok(size - 1),
            Some(size) if size == listed.saturating_add(1) => Ok(listed),
            Some(_) => Err(FestivalError::validation(
                "Team size does not match the number of team members",
            )),
        }
    }

    fn resolve_sub_events<'e>(
        &self,
        event: &'e EventDefinition,
    ) -> Result<Vec<&'e SubEvent>> {
        if !matches!(event.kind, EventKind::MultiEvent { .. }) {
            return Ok(Vec::new());
        }
        if self.sub_events.is_empty() {
            return Err(FestivalError::validation(
                "Please select at least one event",
            ));
        }

        let mut seen = HashSet::new();
        self.sub_events
            .iter()
            .map(|request| {
                if !seen.insert(request.id.as_str()) {
                    return Err(FestivalError::validation(format!(
                        "Event {} was selected more than once",
                        request.id
                    )));
                }
                event.sub_event(&request.id).ok_or_else(|| {
                    FestivalError::validation(format!("Unknown event selected: {}", request.id))
                })
            })
            .collect()
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn validate_members(members: &[TeamMember]) -> Result<()> {
    for (index, member) in members.iter().enumerate() {
        if member.name.trim().is_empty() {
            return Err(FestivalError::validation(format!(
                "Name of team member {} is required",
                index + 1
            )));
        }
        if let Some(email) = present(member.email.as_ref()) {
            if !is_valid_email(email) {
                return Err(FestivalError::validation(format!(
                    "Email of team member {} is invalid",
                    index + 1
                )));
            }
        }
    }
    Ok(())
}

fn check_roster(bounds: &TeamBounds, additional: u32, label: &str) -> Result<()> {
    if bounds.accepts(additional) {
        Ok(())
    } else {
        Err(FestivalError::validation(format!(
            "{label} must have {}",
            bounds.describe()
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::EventRegistry;

    fn member(name: &str) -> TeamMember {
        TeamMember {
            name: name.into(),
            email: None,
            phone: None,
        }
    }

    fn street_play_form(utr: &str) -> RegistrationForm {
        serde_json::from_value(serde_json::json!({
            "team_leader_name": "Asha Rao",
            "team_leader_email": "A@X.com",
            "team_leader_phone": "+91 98765 43210",
            "team_name": "Chaupal",
            "team_size": 3,
            "synopsis": "A play about water scarcity",
            "utr_number": utr,
        }))
        .unwrap()
    }

    #[test]
    fn test_street_play_requires_twelve_digit_utr() {
        let registry = EventRegistry::builtin();
        let event = registry.get("street-play").unwrap();

        let err = street_play_form("12345678901").validate_fields(event).unwrap_err();
        assert!(err.to_string().contains("valid 12-digit UTR"));

        let form = street_play_form("123456789012");
        assert!(form.validate_fields(event).is_ok());
        assert!(form.validate_team_size(event).is_ok());
    }

    #[test]
    fn test_missing_identity_is_rejected() {
        let registry = EventRegistry::builtin();
        let event = registry.get("solo-singing").unwrap();
        let form = RegistrationForm {
            name: Some("  ".into()),
            email: Some("a@x.com".into()),
            phone: Some("9876543210".into()),
            ..RegistrationForm::default()
        };
        assert!(matches!(
            form.validate_fields(event),
            Err(FestivalError::Validation(_))
        ));
    }

    #[test]
    fn test_free_event_needs_no_utr_and_defaults_amount_to_zero() {
        let registry = EventRegistry::builtin();
        let event = registry.get("hackathon").unwrap();
        let form = RegistrationForm {
            name: Some("Asha".into()),
            email: Some("Asha@Example.com".into()),
            phone: Some("9876543210".into()),
            team_name: Some("Null Pointers".into()),
            members: vec![member("Ravi")],
            ..RegistrationForm::default()
        };
        assert!(form.validate_fields(event).is_ok());

        let row = form.into_new_registration(event, Utc::now()).unwrap();
        assert_eq!(row.total_amount, 0);
        assert_eq!(row.amount_paid, 0);
        assert_eq!(row.email, "asha@example.com");
        assert!(!row.payment_proof);
    }

    #[test]
    fn test_team_size_boundaries() {
        let registry = EventRegistry::builtin();
        let hackathon = registry.get("hackathon").unwrap();

        let solo_team = RegistrationForm::default();
        assert!(solo_team.validate_team_size(hackathon).is_err());

        let pair = RegistrationForm {
            members: vec![member("Ravi")],
            ..RegistrationForm::default()
        };
        assert!(pair.validate_team_size(hackathon).is_ok());

        let five = RegistrationForm {
            team_size: Some(5),
            ..RegistrationForm::default()
        };
        assert!(five.validate_team_size(hackathon).is_err());
    }

    #[test]
    fn test_additional_member_bounds_exclude_leader() {
        let registry = EventRegistry::builtin();
        let bands = registry.get("battle-of-bands").unwrap();

        let one_extra = RegistrationForm {
            members: vec![member("Kiran")],
            ..RegistrationForm::default()
        };
        assert!(one_extra.validate_team_size(bands).is_err());

        let two_extra = RegistrationForm {
            members: vec![member("Kiran"), member("Meera")],
            ..RegistrationForm::default()
        };
        assert!(two_extra.validate_team_size(bands).is_ok());
    }

    #[test]
    fn test_team_size_must_agree_with_roster() {
        let registry = EventRegistry::builtin();
        let event = registry.get("hackathon").unwrap();
        let form = RegistrationForm {
            team_size: Some(4),
            members: vec![member("Ravi")],
            ..RegistrationForm::default()
        };
        assert!(form.validate_team_size(event).is_err());
    }

    #[test]
    fn test_multi_event_sums_fees_and_keeps_selection() {
        let registry = EventRegistry::builtin();
        let event = registry.get("cultural-fest").unwrap();
        let form: RegistrationForm = serde_json::from_value(serde_json::json!({
            "participant_name": "Meera",
            "participant_email": "meera@example.com",
            "participant_phone": "9876543210",
            "utr": "123456789012",
            "subEvents": [
                { "id": "solo-dance" },
                { "id": "quiz", "members": [{ "name": "Dev" }] }
            ]
        }))
        .unwrap();

        assert!(form.validate_fields(event).is_ok());
        assert!(form.validate_team_size(event).is_ok());

        let row = form.into_new_registration(event, Utc::now()).unwrap();
        assert_eq!(row.total_amount, 350);
        assert_eq!(row.amount_paid, 350);
        assert_eq!(row.details.sub_events.len(), 2);
        assert_eq!(row.details.sub_events[1].members.len(), 1);
        assert!(row.payment_proof);
    }

    #[test]
    fn test_multi_event_rejects_unknown_and_empty_selection() {
        let registry = EventRegistry::builtin();
        let event = registry.get("cultural-fest").unwrap();
        let mut form = RegistrationForm {
            name: Some("Meera".into()),
            email: Some("meera@example.com".into()),
            phone: Some("9876543210".into()),
            utr_number: Some("123456789012".into()),
            ..RegistrationForm::default()
        };
        assert!(form.validate_fields(event).is_err());

        form.sub_events = vec![SubEventRequest {
            id: "karaoke".into(),
            members: Vec::new(),
        }];
        let err = form.validate_fields(event).unwrap_err();
        assert!(err.to_string().contains("karaoke"));
    }

    #[test]
    fn test_group_sub_event_roster_is_bounded() {
        let registry = EventRegistry::builtin();
        let event = registry.get("cultural-fest").unwrap();
        let form = RegistrationForm {
            sub_events: vec![SubEventRequest {
                id: "group-dance".into(),
                members: vec![member("A"), member("B")],
            }],
            ..RegistrationForm::default()
        };
        assert!(form.validate_team_size(event).is_err());
    }

    #[test]
    fn test_declared_team_size_is_kept() {
        let registry = EventRegistry::builtin();
        let event = registry.get("street-play").unwrap();
        let form = RegistrationForm {
            name: Some("Meera".into()),
            email: Some("meera@example.com".into()),
            phone: Some("9876543210".into()),
            team_name: Some("Chaupal".into()),
            team_size: Some(8),
            synopsis: Some("Water".into()),
            utr_number: Some("123456789012".into()),
            ..RegistrationForm::default()
        };

        let row = form.into_new_registration(event, Utc::now()).unwrap();
        assert_eq!(row.details.team_size, Some(8));
        assert!(row.details.members.is_empty());
    }
}
