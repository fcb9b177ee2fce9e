//! # Festival Testing
//!
//! Testing utilities for the festival platform.
//!
//! This crate provides:
//! - A fixed clock for deterministic timestamps and token expiry
//! - An in-memory [`RegistrationStore`](festival_core::RegistrationStore)
//!   with per-table failure injection
//! - A recording [`Mailer`](festival_core::Mailer) with a failure toggle
//! - Form fixtures for the built-in events
//!
//! ## Example
//!
//! ```
//! use festival_core::RegistrationStore;
//! use festival_testing::InMemoryRegistrationStore;
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryRegistrationStore::new();
//! store.fail_table("hackathon_registrations");
//! assert!(store.list("hackathon_registrations").await.is_err());
//! # });
//! ```

use chrono::{DateTime, Utc};
use festival_core::environment::Clock;

pub mod fixtures;
pub mod mailer;
pub mod store;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same time until explicitly advanced. Clones share the
    /// same instant, so a test can move time forward underneath a pipeline.
    ///
    /// # Example
    ///
    /// ```
    /// use festival_testing::mocks::FixedClock;
    /// use festival_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// assert_eq!(time1, clock.now());
    ///
    /// clock.advance(Duration::hours(25));
    /// assert_eq!(clock.now() - time1, Duration::hours(25));
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward.
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Install a test-friendly tracing subscriber.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mailer::RecordingMailer;
pub use mocks::{FixedClock, test_clock};
pub use store::InMemoryRegistrationStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_clones_share_time() {
        let clock = test_clock();
        let shared = clock.clone();
        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(shared.now(), clock.now());
    }
}
