//! Role-specific session payloads.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Organizer session cookie name.
pub const ORGANIZER_COOKIE: &str = "eo_session";

/// Admin session cookie name.
pub const ADMIN_COOKIE: &str = "admin_session";

/// Payload carried by a session token.
///
/// Each role has its own scope string, embedded in the token and checked on
/// verification, and its own cookie.
pub trait SessionClaims: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Scope written into every token of this role.
    const SCOPE: &'static str;

    /// Cookie that carries the token.
    const COOKIE: &'static str;
}

/// Event organizer session: scoped to a single event table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerClaims {
    /// Event id.
    pub event_id: String,
    /// Event display name.
    pub event_name: String,
    /// Backing table; check-ins and listings use this, never a request value.
    pub table_name: String,
}

impl SessionClaims for OrganizerClaims {
    const SCOPE: &'static str = "organizer";
    const COOKIE: &'static str = ORGANIZER_COOKIE;
}

/// Admin session: access to every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminClaims {
    /// Admin account id.
    pub admin_id: i64,
    /// Login name.
    pub username: String,
    /// Admin role, e.g. `admin` or `super_admin`.
    pub role: String,
}

impl SessionClaims for AdminClaims {
    const SCOPE: &'static str = "admin";
    const COOKIE: &'static str = ADMIN_COOKIE;
}
