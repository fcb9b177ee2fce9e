//! `PostgreSQL` implementation of [`RegistrationStore`].
//!
//! Every event has its own table, so table names are interpolated into the
//! SQL text. They are always checked with
//! [`is_safe_identifier`](festival_core::validation::is_safe_identifier)
//! first; values go through bind parameters.

use chrono::{DateTime, Utc};
use festival_core::validation::is_safe_identifier;
use festival_core::{
    EventCounts, FestivalError, NewRegistration, Registration, RegistrationDetails,
    RegistrationStore, Result, StatusChange,
};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const COLUMNS: &str = "id, name, email, phone, college, team_name, details, total_amount, \
     amount_paid, utr_number, payment_proof, registration_status, payment_verified, \
     checked_in, email_sent, qr_code_sent, created_at, updated_at";

/// `PostgreSQL` registration store.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct PostgresRegistrationStore {
    pool: PgPool,
}

impl PostgresRegistrationStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn checked(table: &str) -> Result<&str> {
    if is_safe_identifier(table) {
        Ok(table)
    } else {
        Err(FestivalError::UnknownTable(table.to_string()))
    }
}

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> FestivalError + '_ {
    move |e| FestivalError::Storage(format!("{context}: {e}"))
}

fn row_to_registration(row: &PgRow) -> Result<Registration> {
    let map = || -> std::result::Result<Registration, sqlx::Error> {
        let status: String = row.try_get("registration_status")?;
        let Json(details): Json<RegistrationDetails> = row.try_get("details")?;
        Ok(Registration {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            college: row.try_get("college")?,
            team_name: row.try_get("team_name")?,
            details,
            total_amount: row.try_get("total_amount")?,
            amount_paid: row.try_get("amount_paid")?,
            utr_number: row.try_get("utr_number")?,
            payment_proof: row.try_get("payment_proof")?,
            registration_status: status
                .parse()
                .map_err(|e: FestivalError| sqlx::Error::Decode(e.to_string().into()))?,
            payment_verified: row.try_get("payment_verified")?,
            checked_in: row.try_get("checked_in")?,
            email_sent: row.try_get("email_sent")?,
            qr_code_sent: row.try_get("qr_code_sent")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    };
    map().map_err(db_error("Malformed registration row"))
}

impl RegistrationStore for PostgresRegistrationStore {
    #[tracing::instrument(skip(self, email))]
    async fn email_exists(&self, table: &str, email: &str) -> Result<bool> {
        let table = checked(table)?;
        let row = sqlx::query(&format!(
            "SELECT EXISTS (SELECT 1 FROM {table} WHERE lower(email) = lower($1))"
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check email"))?;

        row.try_get::<bool, _>(0)
            .map_err(db_error("Failed to check email"))
    }

    #[tracing::instrument(skip(self, registration))]
    async fn insert(&self, table: &str, registration: &NewRegistration) -> Result<Registration> {
        let table = checked(table)?;
        let details = serde_json::to_value(&registration.details)
            .map_err(|e| FestivalError::Storage(format!("Failed to encode details: {e}")))?;

        let row = sqlx::query(&format!(
            r"
            INSERT INTO {table} (
                name, email, phone, college, team_name, details, total_amount,
                amount_paid, utr_number, payment_proof, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&registration.name)
        .bind(&registration.email)
        .bind(&registration.phone)
        .bind(&registration.college)
        .bind(&registration.team_name)
        .bind(details)
        .bind(registration.total_amount)
        .bind(registration.amount_paid)
        .bind(&registration.utr_number)
        .bind(registration.payment_proof)
        .bind(registration.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to insert registration"))?;

        let inserted = row_to_registration(&row)?;
        tracing::debug!(id = %inserted.id, "registration inserted");
        Ok(inserted)
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, table: &str, id: Uuid) -> Result<Option<Registration>> {
        let table = checked(table)?;
        sqlx::query(&format!("SELECT {COLUMNS} FROM {table} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load registration"))?
            .as_ref()
            .map(row_to_registration)
            .transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, table: &str) -> Result<Vec<Registration>> {
        let table = checked(table)?;
        sqlx::query(&format!(
            "SELECT {COLUMNS} FROM {table} ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list registrations"))?
        .iter()
        .map(row_to_registration)
        .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn mark_delivered(&self, table: &str, id: Uuid) -> Result<()> {
        let table = checked(table)?;
        sqlx::query(&format!(
            "UPDATE {table} SET email_sent = TRUE, qr_code_sent = TRUE WHERE id = $1"
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record delivery"))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(
        &self,
        table: &str,
        id: Uuid,
        change: StatusChange,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let table = checked(table)?;
        let result = sqlx::query(&format!(
            r"
            UPDATE {table}
            SET registration_status = $2, payment_verified = $3, updated_at = $4
            WHERE id = $1
            "
        ))
        .bind(id)
        .bind(change.registration_status.as_str())
        .bind(change.payment_verified)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update status"))?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn mark_checked_in(&self, table: &str, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let table = checked(table)?;
        let result = sqlx::query(&format!(
            "UPDATE {table} SET checked_in = TRUE, updated_at = $2 WHERE id = $1"
        ))
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record check-in"))?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn stats(&self, table: &str) -> Result<EventCounts> {
        let table = checked(table)?;
        let row = sqlx::query(&format!(
            r"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE registration_status = 'verified') AS verified,
                COUNT(*) FILTER (WHERE registration_status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE registration_status = 'cancelled') AS cancelled,
                COALESCE(SUM(amount_paid) FILTER (WHERE payment_verified), 0)::BIGINT
                    AS collected_amount,
                COUNT(*) FILTER (WHERE checked_in) AS checked_in
            FROM {table}
            "
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to aggregate registrations"))?;

        let counts = || -> std::result::Result<EventCounts, sqlx::Error> {
            Ok(EventCounts {
                total: row.try_get("total")?,
                verified: row.try_get("verified")?,
                pending: row.try_get("pending")?,
                cancelled: row.try_get("cancelled")?,
                collected_amount: row.try_get("collected_amount")?,
                checked_in: row.try_get("checked_in")?,
            })
        };
        counts().map_err(db_error("Malformed aggregate row"))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error("Database unreachable"))?;
        Ok(())
    }
}
