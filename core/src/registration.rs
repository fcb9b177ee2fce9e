//! Registration rows and their event-specific details.

use crate::error::FestivalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Verification state of a registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Submitted, not yet reviewed by an admin.
    #[default]
    Pending,
    /// Accepted by an admin.
    Verified,
    /// Rejected or withdrawn.
    Cancelled,
}

impl RegistrationStatus {
    /// Column value stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = FestivalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(FestivalError::validation(format!(
                "Unknown registration status: {other}"
            ))),
        }
    }
}

/// One member of a team roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Member name.
    pub name: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Optional contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A sub-event chosen in a multi-event registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubEventSelection {
    /// Sub-event id from the event catalog.
    pub sub_event_id: String,
    /// Display name resolved from the catalog.
    pub name: String,
    /// Fee resolved from the catalog.
    pub fee: i64,
    /// Roster for team sub-events.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<TeamMember>,
}

/// Event-specific columns, stored as one JSON document.
///
/// Tables share the identity, financial and status columns; everything that
/// differs between events lives here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetails {
    /// Additional team members (the leader is the registration itself).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<TeamMember>,
    /// Declared team size including the leader, for team events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<u32>,
    /// Street play synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    /// Custom questionnaire answers keyed by question id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub answers: BTreeMap<String, String>,
    /// Chosen sub-events (multi-event registrations only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_events: Vec<SubEventSelection>,
}

/// A validated registration ready to be inserted.
///
/// The id is not part of it: the store generates it at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    /// Participant or team leader name.
    pub name: String,
    /// Lower-cased email, unique per event table.
    pub email: String,
    /// Normalized phone number.
    pub phone: String,
    /// College or institution.
    pub college: Option<String>,
    /// Team name for team events.
    pub team_name: Option<String>,
    /// Event-specific details.
    pub details: RegistrationDetails,
    /// Amount due.
    pub total_amount: i64,
    /// Amount the participant reports as paid.
    pub amount_paid: i64,
    /// Bank transaction reference.
    pub utr_number: Option<String>,
    /// Whether proof of payment was supplied.
    pub payment_proof: bool,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// A persisted registration row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Generated identifier, also the QR payload.
    pub id: Uuid,
    /// Participant or team leader name.
    pub name: String,
    /// Lower-cased email.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// College or institution.
    pub college: Option<String>,
    /// Team name.
    pub team_name: Option<String>,
    /// Event-specific details.
    pub details: RegistrationDetails,
    /// Amount due.
    pub total_amount: i64,
    /// Amount paid.
    pub amount_paid: i64,
    /// Bank transaction reference.
    pub utr_number: Option<String>,
    /// Proof of payment supplied.
    pub payment_proof: bool,
    /// Verification state.
    pub registration_status: RegistrationStatus,
    /// Payment confirmed by an admin.
    pub payment_verified: bool,
    /// Attendance recorded at the venue. Never reset once set.
    pub checked_in: bool,
    /// Confirmation email delivered.
    pub email_sent: bool,
    /// QR code delivered.
    pub qr_code_sent: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Materialize a new row from a validated submission.
    ///
    /// Used by stores that generate ids in process.
    #[must_use]
    pub fn from_new(id: Uuid, new: NewRegistration) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            college: new.college,
            team_name: new.team_name,
            details: new.details,
            total_amount: new.total_amount,
            amount_paid: new.amount_paid,
            utr_number: new.utr_number,
            payment_proof: new.payment_proof,
            registration_status: RegistrationStatus::Pending,
            payment_verified: false,
            checked_in: false,
            email_sent: false,
            qr_code_sent: false,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    /// Team size including the leader.
    #[must_use]
    pub fn team_size(&self) -> usize {
        self.details
            .team_size
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or(self.details.members.len() + 1)
    }
}

/// Admin-initiated change of the status columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// New verification state.
    pub registration_status: RegistrationStatus,
    /// New payment verification flag.
    pub payment_verified: bool,
}
