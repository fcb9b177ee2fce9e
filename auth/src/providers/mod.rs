//! Provider traits for back-office accounts.

pub mod credentials;

pub use credentials::{AdminAccount, CredentialStore, OrganizerAccount};
