//! Credential store trait.

use crate::error::Result;
use chrono::{DateTime, Utc};

/// Event organizer account (`eo_auth`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerAccount {
    /// Account id.
    pub id: i64,
    /// Login name, unique case-insensitively.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Event this organizer manages.
    pub event_id: String,
    /// Disabled accounts cannot log in.
    pub is_active: bool,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
}

/// Admin account (`admin_auth`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    /// Account id.
    pub id: i64,
    /// Login name, unique case-insensitively.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Admin role.
    pub role: String,
    /// Disabled accounts cannot log in.
    pub is_active: bool,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
}

/// Credential store.
///
/// Lookups match usernames case-insensitively and return inactive accounts
/// too; deciding what an inactive account may do is up to the caller.
pub trait CredentialStore: Send + Sync {
    /// Find an organizer account by username.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn find_organizer(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<OrganizerAccount>>> + Send;

    /// Find an admin account by username.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn find_admin(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<AdminAccount>>> + Send;

    /// Record a successful organizer login.
    ///
    /// # Errors
    ///
    /// Returns error if the update fails.
    fn touch_organizer_login(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Record a successful admin login.
    ///
    /// # Errors
    ///
    /// Returns error if the update fails.
    fn touch_admin_login(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
