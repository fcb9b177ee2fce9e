//! Registration store trait.

use crate::error::Result;
use crate::registration::{NewRegistration, Registration, StatusChange};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Aggregate counts for one event table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCounts {
    /// All registrations.
    pub total: i64,
    /// Registrations with status `verified`.
    pub verified: i64,
    /// Registrations with status `pending`.
    pub pending: i64,
    /// Registrations with status `cancelled`.
    pub cancelled: i64,
    /// Sum of `amount_paid` over payment-verified rows.
    pub collected_amount: i64,
    /// Registrations checked in at the venue.
    pub checked_in: i64,
}

/// Registration store.
///
/// One table per event; every method takes the table name, which callers
/// resolve through the [`EventRegistry`](crate::EventRegistry) first.
pub trait RegistrationStore: Send + Sync {
    /// Check whether a (lower-cased) email is already registered.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn email_exists(
        &self,
        table: &str,
        email: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Insert a new registration and return the stored row.
    ///
    /// The store generates the id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The insert fails
    /// - A uniqueness constraint is violated
    fn insert(
        &self,
        table: &str,
        registration: &NewRegistration,
    ) -> impl std::future::Future<Output = Result<Registration>> + Send;

    /// Fetch one registration by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn find(
        &self,
        table: &str,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Registration>>> + Send;

    /// List a table's registrations, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn list(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Registration>>> + Send;

    /// Set `email_sent` and `qr_code_sent`.
    ///
    /// # Errors
    ///
    /// Returns error if the update fails.
    fn mark_delivered(
        &self,
        table: &str,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Apply an admin status change.
    ///
    /// # Returns
    ///
    /// `false` if no row has this id.
    ///
    /// # Errors
    ///
    /// Returns error if the update fails.
    fn update_status(
        &self,
        table: &str,
        id: Uuid,
        change: StatusChange,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Set `checked_in`. The flag is never cleared.
    ///
    /// # Returns
    ///
    /// `false` if no row has this id.
    ///
    /// # Errors
    ///
    /// Returns error if the update fails.
    fn mark_checked_in(
        &self,
        table: &str,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Aggregate counts for a table.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn stats(&self, table: &str) -> impl std::future::Future<Output = Result<EventCounts>> + Send;

    /// Check that the backing storage is reachable.
    ///
    /// # Errors
    ///
    /// Returns error if the storage cannot be reached.
    fn ping(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}
