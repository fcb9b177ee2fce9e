//! Registration form fixtures for the built-in events.

use festival_core::{RegistrationForm, SubEventRequest, TeamMember};

/// A roster member with only a name.
#[must_use]
pub fn member(name: &str) -> TeamMember {
    TeamMember {
        name: name.to_string(),
        email: None,
        phone: None,
    }
}

/// `n` named roster members.
#[must_use]
pub fn members(n: usize) -> Vec<TeamMember> {
    (1..=n).map(|i| member(&format!("Member {i}"))).collect()
}

/// Valid solo-singing submission.
#[must_use]
pub fn solo_form(email: &str) -> RegistrationForm {
    RegistrationForm {
        name: Some("Asha Rao".into()),
        email: Some(email.to_string()),
        phone: Some("9876543210".into()),
        college: Some("Government College of Arts".into()),
        utr_number: Some("123456789012".into()),
        ..RegistrationForm::default()
    }
}

/// Hackathon submission with `additional` members besides the leader.
#[must_use]
pub fn hackathon_form(email: &str, additional: usize) -> RegistrationForm {
    RegistrationForm {
        name: Some("Ravi Kumar".into()),
        email: Some(email.to_string()),
        phone: Some("9123456780".into()),
        team_name: Some("Null Pointers".into()),
        members: members(additional),
        ..RegistrationForm::default()
    }
}

/// Street play submission declaring a team of `team_size` with the given UTR.
#[must_use]
pub fn street_play_form(email: &str, team_size: u32, utr: &str) -> RegistrationForm {
    RegistrationForm {
        name: Some("Meera Iyer".into()),
        email: Some(email.to_string()),
        phone: Some("+91 99887 76655".into()),
        team_name: Some("Chaupal".into()),
        team_size: Some(team_size),
        synopsis: Some("A street play about water scarcity".into()),
        utr_number: Some(utr.to_string()),
        ..RegistrationForm::default()
    }
}

/// Cultural fest submission for the given sub-event ids.
#[must_use]
pub fn cultural_fest_form(email: &str, sub_events: &[&str]) -> RegistrationForm {
    RegistrationForm {
        name: Some("Dev Patel".into()),
        email: Some(email.to_string()),
        phone: Some("9000000001".into()),
        utr_number: Some("998877665544".into()),
        sub_events: sub_events
            .iter()
            .map(|id| SubEventRequest {
                id: (*id).to_string(),
                members: Vec::new(),
            })
            .collect(),
        ..RegistrationForm::default()
    }
}
