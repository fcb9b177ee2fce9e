//! Mock credential store for testing.

use crate::error::{AuthError, Result};
use crate::password::hash_password;
use crate::providers::{AdminAccount, CredentialStore, OrganizerAccount};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// Mock credential store.
///
/// Uses in-memory storage keyed by lower-cased username. Clones share
/// state.
#[derive(Debug, Clone, Default)]
pub struct MockCredentialStore {
    organizers: Arc<Mutex<HashMap<String, OrganizerAccount>>>,
    admins: Arc<Mutex<HashMap<String, AdminAccount>>>,
    next_id: Arc<AtomicI64>,
}

impl MockCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active organizer account with a freshly hashed password.
    ///
    /// # Errors
    ///
    /// Returns error if hashing fails.
    pub fn add_organizer(
        &self,
        username: &str,
        password: &str,
        event_id: &str,
    ) -> Result<OrganizerAccount> {
        let account = OrganizerAccount {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: username.to_string(),
            password_hash: hash_password(password)?,
            event_id: event_id.to_string(),
            is_active: true,
            last_login: None,
        };
        self.organizers
            .lock()
            .map_err(|_| AuthError::InternalError)?
            .insert(username.to_lowercase(), account.clone());
        Ok(account)
    }

    /// Add an active admin account with a freshly hashed password.
    ///
    /// # Errors
    ///
    /// Returns error if hashing fails.
    pub fn add_admin(&self, username: &str, password: &str, role: &str) -> Result<AdminAccount> {
        let account = AdminAccount {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: role.to_string(),
            is_active: true,
            last_login: None,
        };
        self.admins
            .lock()
            .map_err(|_| AuthError::InternalError)?
            .insert(username.to_lowercase(), account.clone());
        Ok(account)
    }

    /// Enable or disable an organizer account.
    pub fn set_organizer_active(&self, username: &str, active: bool) {
        if let Ok(mut organizers) = self.organizers.lock() {
            if let Some(account) = organizers.get_mut(&username.to_lowercase()) {
                account.is_active = active;
            }
        }
    }
}

impl CredentialStore for MockCredentialStore {
    fn find_organizer(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<OrganizerAccount>>> + Send {
        let organizers = Arc::clone(&self.organizers);
        let key = username.to_lowercase();

        async move {
            Ok(organizers
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(&key)
                .cloned())
        }
    }

    fn find_admin(&self, username: &str) -> impl Future<Output = Result<Option<AdminAccount>>> + Send {
        let admins = Arc::clone(&self.admins);
        let key = username.to_lowercase();

        async move {
            Ok(admins
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(&key)
                .cloned())
        }
    }

    fn touch_organizer_login(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send {
        let organizers = Arc::clone(&self.organizers);

        async move {
            let mut organizers = organizers.lock().map_err(|_| AuthError::InternalError)?;
            if let Some(account) = organizers.values_mut().find(|a| a.id == id) {
                account.last_login = Some(at);
            }
            Ok(())
        }
    }

    fn touch_admin_login(&self, id: i64, at: DateTime<Utc>) -> impl Future<Output = Result<()>> + Send {
        let admins = Arc::clone(&self.admins);

        async move {
            let mut admins = admins.lock().map_err(|_| AuthError::InternalError)?;
            if let Some(account) = admins.values_mut().find(|a| a.id == id) {
                account.last_login = Some(at);
            }
            Ok(())
        }
    }
}
