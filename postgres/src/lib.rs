//! `PostgreSQL` storage for the festival service.
//!
//! Provides [`PostgresRegistrationStore`], the production implementation of
//! [`festival_core::RegistrationStore`], and the schema migrations for the
//! registration and back-office account tables.
//!
//! # Example
//!
//! ```no_run
//! use festival_core::EventRegistry;
//! use festival_postgres::{migrate, PostgresRegistrationStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = sqlx::PgPool::connect("postgres://localhost/festival").await?;
//! migrate(&pool, &EventRegistry::builtin()).await?;
//! let store = PostgresRegistrationStore::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod registrations;
pub mod schema;

pub use registrations::PostgresRegistrationStore;
pub use schema::{ensure_event_tables, migrate, MIGRATOR};
