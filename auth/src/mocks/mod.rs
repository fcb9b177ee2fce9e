//! Mock implementations for testing.

pub mod credentials;

pub use credentials::MockCredentialStore;
