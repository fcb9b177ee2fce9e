//! # Festival Back-Office Authentication
//!
//! Session handling for the two back-offices: event organizers, who manage
//! a single event, and admins, who see every event.
//!
//! ## Features
//!
//! - **Signed sessions**: HS256 tokens with a role scope and 24 hour expiry
//! - **Separate secrets**: organizer and admin tokens never verify against
//!   each other
//! - **Route guard**: redirects for the static dashboard pages, with expired
//!   cookies cleared on the way out
//! - **Credentials**: Argon2 password hashes behind the [`CredentialStore`]
//!   trait, with an in-memory mock and a `PostgreSQL` implementation
//!
//! ## Example
//!
//! ```rust
//! use festival_auth::{guard, GuardDecision, GuardPaths, OrganizerClaims, SessionTokens};
//! use festival_core::SystemClock;
//! use std::sync::Arc;
//!
//! let tokens = SessionTokens::<OrganizerClaims>::new(b"eo-secret", Arc::new(SystemClock));
//! let token = tokens
//!     .issue_now(&OrganizerClaims {
//!         event_id: "hackathon".into(),
//!         event_name: "24h Hackathon".into(),
//!         table_name: "hackathon_registrations".into(),
//!     })
//!     .unwrap();
//!
//! let verdict = tokens.verify_now(&token);
//! assert_eq!(
//!     guard(&GuardPaths::organizer(), "/organizer/dashboard", Some(&verdict)),
//!     GuardDecision::Allow
//! );
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod claims;
pub mod cookies;
pub mod error;
pub mod guard;
pub mod password;
pub mod providers;
pub mod stores;
pub mod token;

#[cfg(feature = "axum")]
pub mod middleware;

// Mock providers for testing
#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-exports
pub use claims::{AdminClaims, OrganizerClaims, SessionClaims, ADMIN_COOKIE, ORGANIZER_COOKIE};
pub use cookies::{clear_cookie, read_cookie, session_cookie};
pub use error::{AuthError, Result};
pub use guard::{guard, GuardDecision, GuardPaths};
pub use password::{hash_password, verify_password};
pub use providers::{AdminAccount, CredentialStore, OrganizerAccount};
pub use token::{SessionTokens, SessionVerdict, SESSION_TTL};

#[cfg(feature = "axum")]
pub use middleware::{enforce, AdminSession, OrganizerSession, RouteGuard, Session};
