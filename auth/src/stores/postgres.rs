//! PostgreSQL credential store.
//!
//! Reads the `eo_auth` and `admin_auth` tables created by the
//! `festival-postgres` migrations.
//!
//! # Example
//!
//! ```no_run
//! use festival_auth::stores::PostgresCredentialStore;
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgresql://localhost/festival").await?;
//! let store = PostgresCredentialStore::new(pool);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::providers::{AdminAccount, CredentialStore, OrganizerAccount};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

/// `PostgreSQL` credential store.
#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    /// Create a new `PostgreSQL` credential store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> AuthError + '_ {
    move |e| AuthError::DatabaseError(format!("{context}: {e}"))
}

impl CredentialStore for PostgresCredentialStore {
    async fn find_organizer(&self, username: &str) -> Result<Option<OrganizerAccount>> {
        let row = sqlx::query(
            r"
            SELECT id, username, password_hash, event_id, is_active, last_login
            FROM eo_auth
            WHERE lower(username) = lower($1)
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load organizer"))?;

        row.map(|row| {
            Ok::<_, sqlx::Error>(OrganizerAccount {
                id: row.try_get("id")?,
                username: row.try_get("username")?,
                password_hash: row.try_get("password_hash")?,
                event_id: row.try_get("event_id")?,
                is_active: row.try_get("is_active")?,
                last_login: row.try_get("last_login")?,
            })
        })
        .transpose()
        .map_err(db_error("Malformed organizer row"))
    }

    async fn find_admin(&self, username: &str) -> Result<Option<AdminAccount>> {
        let row = sqlx::query(
            r"
            SELECT id, username, password_hash, role, is_active, last_login
            FROM admin_auth
            WHERE lower(username) = lower($1)
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load admin"))?;

        row.map(|row| {
            Ok::<_, sqlx::Error>(AdminAccount {
                id: row.try_get("id")?,
                username: row.try_get("username")?,
                password_hash: row.try_get("password_hash")?,
                role: row.try_get("role")?,
                is_active: row.try_get("is_active")?,
                last_login: row.try_get("last_login")?,
            })
        })
        .transpose()
        .map_err(db_error("Malformed admin row"))
    }

    async fn touch_organizer_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE eo_auth SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to record organizer login"))?;
        Ok(())
    }

    async fn touch_admin_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE admin_auth SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to record admin login"))?;
        Ok(())
    }
}
