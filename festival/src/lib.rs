//! # Festival
//!
//! Registration service and back-office API for a university festival.
//!
//! ## Flows
//!
//! ```text
//! participant ──POST /api/register/:event──▶ validate ─▶ duplicate check ─▶ insert
//!                                                                   │
//!                                         QR (PNG) ─▶ confirmation email ─▶ delivery flags
//!
//! organizer ──login──▶ eo_session ──▶ /organizer/* pages, listing, check-in
//! admin     ──login──▶ admin_session ─▶ /admin/* pages, listing, status updates, stats
//! ```
//!
//! ## Modules
//!
//! - [`pipeline`]: every operation, as methods on [`FestivalApp`]
//! - [`api`] and [`server`]: axum handlers, router and shared state
//! - [`mail`]: SMTP and console mailers, email templates
//! - [`qr`]: QR code rendering
//! - [`config`]: environment configuration
//! - [`metrics`]: business counters

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod mail;
pub mod metrics;
pub mod pipeline;
pub mod qr;
pub mod server;

pub use config::Config;
pub use mail::ConfiguredMailer;
pub use pipeline::{FestivalApp, PipelineError};
pub use server::{build_router, AppState};

use festival_auth::stores::PostgresCredentialStore;
use festival_postgres::PostgresRegistrationStore;

/// The application wired to Postgres and the configured mail relay.
pub type ProductionApp =
    FestivalApp<PostgresRegistrationStore, PostgresCredentialStore, ConfiguredMailer>;
