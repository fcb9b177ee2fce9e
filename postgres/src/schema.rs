//! Schema migrations.
//!
//! The SQL files under `migrations/` create the account tables and the
//! tables of the built-in catalog. A catalog loaded from a file may name
//! other tables; [`ensure_event_tables`] creates those with the same layout.

use festival_core::validation::is_safe_identifier;
use festival_core::{EventRegistry, FestivalError, Result};
use sqlx::migrate::Migrator;
use sqlx::PgPool;

/// Embedded migrations from `postgres/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run the embedded migrations, then create any missing event tables.
///
/// # Errors
///
/// Returns [`FestivalError::Storage`] if a migration or DDL statement fails.
pub async fn migrate(pool: &PgPool, registry: &EventRegistry) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| FestivalError::Storage(format!("Migration failed: {e}")))?;
    ensure_event_tables(pool, registry).await
}

/// Create the registration table of every event in `registry` if missing.
///
/// # Errors
///
/// Returns [`FestivalError::UnknownTable`] for a table name that is not a
/// plain identifier, or [`FestivalError::Storage`] if DDL fails.
pub async fn ensure_event_tables(pool: &PgPool, registry: &EventRegistry) -> Result<()> {
    for event in registry.iter() {
        for statement in event_table_ddl(&event.table_name)? {
            sqlx::query(&statement)
                .execute(pool)
                .await
                .map_err(|e| {
                    FestivalError::Storage(format!("Failed to create {}: {e}", event.table_name))
                })?;
        }
        tracing::debug!(event = %event.id, table = %event.table_name, "event table ready");
    }
    Ok(())
}

fn event_table_ddl(table: &str) -> Result<Vec<String>> {
    if !is_safe_identifier(table) {
        return Err(FestivalError::UnknownTable(table.to_string()));
    }
    Ok(vec![
        format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                college TEXT,
                team_name TEXT,
                details JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                total_amount BIGINT NOT NULL DEFAULT 0,
                amount_paid BIGINT NOT NULL DEFAULT 0,
                utr_number TEXT,
                payment_proof BOOLEAN NOT NULL DEFAULT FALSE,
                registration_status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (registration_status IN ('pending', 'verified', 'cancelled')),
                payment_verified BOOLEAN NOT NULL DEFAULT FALSE,
                checked_in BOOLEAN NOT NULL DEFAULT FALSE,
                email_sent BOOLEAN NOT NULL DEFAULT FALSE,
                qr_code_sent BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "
        ),
        format!("CREATE UNIQUE INDEX IF NOT EXISTS {table}_email_key ON {table} (lower(email))"),
        format!(
            "CREATE INDEX IF NOT EXISTS {table}_created_at_idx ON {table} (created_at DESC)"
        ),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_rejects_unsafe_table_names() {
        assert_eq!(
            event_table_ddl("x; DROP TABLE eo_auth").unwrap_err(),
            FestivalError::UnknownTable("x; DROP TABLE eo_auth".into())
        );
    }

    #[test]
    fn test_ddl_declares_case_insensitive_email_index() {
        let ddl = event_table_ddl("quiz_registrations").unwrap();
        assert_eq!(ddl.len(), 3);
        assert!(ddl[0].contains("CREATE TABLE IF NOT EXISTS quiz_registrations"));
        assert!(ddl[0].contains("details JSONB NOT NULL DEFAULT '{}'::jsonb"));
        assert!(ddl[1].contains("quiz_registrations_email_key"));
        assert!(ddl[1].contains("(lower(email))"));
    }
}
