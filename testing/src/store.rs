//! In-memory registration store.

use chrono::{DateTime, Utc};
use festival_core::{
    EventCounts, FestivalError, NewRegistration, Registration, RegistrationStatus,
    RegistrationStore, Result, StatusChange,
};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

type Tables = HashMap<String, Vec<Registration>>;

/// In-memory registration store.
///
/// Tables are created on first use. Individual tables can be made to fail
/// every operation, which is how tests exercise per-table error tolerance.
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistrationStore {
    tables: Arc<Mutex<Tables>>,
    failing: Arc<Mutex<HashSet<String>>>,
    writes: Arc<AtomicUsize>,
    offline: Arc<AtomicBool>,
}

impl InMemoryRegistrationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation on `table` fail with a storage error.
    pub fn fail_table(&self, table: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(table.to_string());
        }
    }

    /// Undo [`fail_table`](Self::fail_table).
    pub fn heal_table(&self, table: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.remove(table);
        }
    }

    /// Snapshot of a table's rows in insertion order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Registration> {
        self.tables
            .lock()
            .ok()
            .and_then(|tables| tables.get(table).cloned())
            .unwrap_or_default()
    }

    /// Number of successful writes (inserts and updates) so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make [`ping`](RegistrationStore::ping) fail, as if the database were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Put a fully formed row into a table, bypassing the pipeline.
    pub fn seed(&self, table: &str, row: Registration) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.entry(table.to_string()).or_default().push(row);
        }
    }

    fn check(&self, table: &str) -> Result<()> {
        let failing = self
            .failing
            .lock()
            .map_err(|_| FestivalError::Storage("lock poisoned".into()))?;
        if failing.contains(table) {
            return Err(FestivalError::Storage(format!(
                "relation \"{table}\" is unavailable"
            )));
        }
        Ok(())
    }

    fn with_tables<T>(&self, table: &str, f: impl FnOnce(&mut Tables) -> T) -> Result<T> {
        self.check(table)?;
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| FestivalError::Storage("lock poisoned".into()))?;
        Ok(f(&mut tables))
    }

    fn update_row(
        &self,
        table: &str,
        id: Uuid,
        apply: impl FnOnce(&mut Registration),
    ) -> Result<bool> {
        let found = self.with_tables(table, |tables| {
            tables
                .get_mut(table)
                .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
                .map(apply)
                .is_some()
        })?;
        if found {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(found)
    }
}

impl RegistrationStore for InMemoryRegistrationStore {
    fn email_exists(&self, table: &str, email: &str) -> impl Future<Output = Result<bool>> + Send {
        let result = self.with_tables(table, |tables| {
            tables
                .get(table)
                .is_some_and(|rows| rows.iter().any(|r| r.email.eq_ignore_ascii_case(email)))
        });
        async move { result }
    }

    fn insert(
        &self,
        table: &str,
        registration: &NewRegistration,
    ) -> impl Future<Output = Result<Registration>> + Send {
        let result = self
            .with_tables(table, |tables| {
                let rows = tables.entry(table.to_string()).or_default();
                if rows
                    .iter()
                    .any(|r| r.email.eq_ignore_ascii_case(&registration.email))
                {
                    return Err(FestivalError::Storage(format!(
                        "duplicate key value violates unique constraint \"{table}_email_key\""
                    )));
                }
                let row = Registration::from_new(Uuid::new_v4(), registration.clone());
                rows.push(row.clone());
                Ok(row)
            })
            .and_then(|inserted| inserted);
        if result.is_ok() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        async move { result }
    }

    fn find(
        &self,
        table: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Registration>>> + Send {
        let result = self.with_tables(table, |tables| {
            tables
                .get(table)
                .and_then(|rows| rows.iter().find(|r| r.id == id).cloned())
        });
        async move { result }
    }

    fn list(&self, table: &str) -> impl Future<Output = Result<Vec<Registration>>> + Send {
        let result = self.with_tables(table, |tables| {
            let mut rows = tables.get(table).cloned().unwrap_or_default();
            rows.reverse();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows
        });
        async move { result }
    }

    fn mark_delivered(&self, table: &str, id: Uuid) -> impl Future<Output = Result<()>> + Send {
        let result = self
            .update_row(table, id, |row| {
                row.email_sent = true;
                row.qr_code_sent = true;
            })
            .map(|_| ());
        async move { result }
    }

    fn update_status(
        &self,
        table: &str,
        id: Uuid,
        change: StatusChange,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool>> + Send {
        let result = self.update_row(table, id, |row| {
            row.registration_status = change.registration_status;
            row.payment_verified = change.payment_verified;
            row.updated_at = at;
        });
        async move { result }
    }

    fn mark_checked_in(
        &self,
        table: &str,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool>> + Send {
        let result = self.update_row(table, id, |row| {
            row.checked_in = true;
            row.updated_at = at;
        });
        async move { result }
    }

    fn stats(&self, table: &str) -> impl Future<Output = Result<EventCounts>> + Send {
        let result = self.with_tables(table, |tables| {
            let rows = tables.get(table).map(Vec::as_slice).unwrap_or_default();
            let count = |pred: &dyn Fn(&Registration) -> bool| {
                i64::try_from(rows.iter().filter(|r| pred(r)).count()).unwrap_or(i64::MAX)
            };
            EventCounts {
                total: count(&|_| true),
                verified: count(&|r| r.registration_status == RegistrationStatus::Verified),
                pending: count(&|r| r.registration_status == RegistrationStatus::Pending),
                cancelled: count(&|r| r.registration_status == RegistrationStatus::Cancelled),
                collected_amount: rows
                    .iter()
                    .filter(|r| r.payment_verified)
                    .map(|r| r.amount_paid)
                    .sum(),
                checked_in: count(&|r| r.checked_in),
            }
        });
        async move { result }
    }

    fn ping(&self) -> impl Future<Output = Result<()>> + Send {
        let offline = self.offline.load(Ordering::SeqCst);
        async move {
            if offline {
                Err(FestivalError::Storage("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::test_clock;
    use festival_core::{Clock, EventRegistry};

    const TABLE: &str = "solo_singing_registrations";

    fn new_row(email: &str) -> NewRegistration {
        let registry = EventRegistry::builtin();
        let event = registry.get("solo-singing").unwrap();
        fixtures::solo_form(email)
            .into_new_registration(event, test_clock().now())
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryRegistrationStore::new();
        let row = store.insert(TABLE, &new_row("a@x.com")).await.unwrap();

        let found = store.find(TABLE, row.id).await.unwrap();
        assert_eq!(found, Some(row));
        assert!(store.email_exists(TABLE, "A@X.COM").await.unwrap());
        assert!(!store.email_exists("other", "a@x.com").await.unwrap());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let store = InMemoryRegistrationStore::new();
        store.insert(TABLE, &new_row("a@x.com")).await.unwrap();
        assert!(store.insert(TABLE, &new_row("a@x.com")).await.is_err());
        assert_eq!(store.rows(TABLE).len(), 1);
    }

    #[tokio::test]
    async fn test_failing_table() {
        let store = InMemoryRegistrationStore::new();
        store.fail_table(TABLE);
        assert!(store.stats(TABLE).await.is_err());
        assert!(store.stats("hackathon_registrations").await.is_ok());

        store.heal_table(TABLE);
        assert_eq!(store.stats(TABLE).await.unwrap(), EventCounts::default());
    }

    #[tokio::test]
    async fn test_stats_counts_verified_payments() {
        let store = InMemoryRegistrationStore::new();
        let a = store.insert(TABLE, &new_row("a@x.com")).await.unwrap();
        store.insert(TABLE, &new_row("b@x.com")).await.unwrap();

        let change = StatusChange {
            registration_status: RegistrationStatus::Verified,
            payment_verified: true,
        };
        assert!(store.update_status(TABLE, a.id, change, Utc::now()).await.unwrap());
        assert!(store.mark_checked_in(TABLE, a.id, Utc::now()).await.unwrap());

        let counts = store.stats(TABLE).await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.verified, 1);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.collected_amount, 100);
        assert_eq!(counts.checked_in, 1);
    }

    #[tokio::test]
    async fn test_updates_on_missing_row_report_false() {
        let store = InMemoryRegistrationStore::new();
        assert!(!store.mark_checked_in(TABLE, Uuid::new_v4(), Utc::now()).await.unwrap());
        assert_eq!(store.write_count(), 0);
    }
}
