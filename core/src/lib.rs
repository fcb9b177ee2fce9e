//! # Festival Core
//!
//! Domain types and dependency-injection traits shared by every crate of the
//! festival platform.
//!
//! ## Core Concepts
//!
//! - **Event definition**: static configuration of one festival event (table,
//!   fee, team bounds, sender address), collected in an [`EventRegistry`]
//!   built once at startup
//! - **Registration**: one row per participant or team in an event's table
//! - **Registration form**: the submitted fields, validated per [`EventKind`]
//! - **Providers**: [`RegistrationStore`] and [`Mailer`] abstract the managed
//!   database and the outbound mail relay
//! - **Environment**: [`Clock`] abstracts time for deterministic tests
//!
//! ## Example
//!
//! ```
//! use festival_core::{EventRegistry, RegistrationForm};
//!
//! let registry = EventRegistry::builtin();
//! let event = registry.get("hackathon").expect("builtin event");
//!
//! let form = RegistrationForm {
//!     name: Some("Asha Rao".into()),
//!     email: Some("asha@example.com".into()),
//!     phone: Some("9876543210".into()),
//!     team_name: Some("Null Pointers".into()),
//!     team_size: Some(2),
//!     ..RegistrationForm::default()
//! };
//!
//! assert!(form.validate_fields(event).is_ok());
//! assert!(form.validate_team_size(event).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod environment;
pub mod error;
pub mod event;
pub mod form;
pub mod mail;
pub mod registration;
pub mod store;
pub mod validation;

pub use environment::{Clock, SystemClock};
pub use error::{FestivalError, Result};
pub use event::{
    EventDefinition, EventKind, EventRegistry, MemberCounting, SubEvent, TeamBounds,
};
pub use form::{RegistrationForm, SubEventRequest};
pub use mail::{EmbeddedImage, MailError, Mailer, OutboundEmail};
pub use registration::{
    NewRegistration, Registration, RegistrationDetails, RegistrationStatus, StatusChange,
    SubEventSelection, TeamMember,
};
pub use store::{EventCounts, RegistrationStore};
