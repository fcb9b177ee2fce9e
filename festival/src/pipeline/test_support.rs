//! Pipeline harness backed by in-memory providers.

use super::FestivalApp;
use crate::config::{AuthConfig, MailConfig};
use festival_auth::mocks::MockCredentialStore;
use festival_core::EventRegistry;
use festival_testing::{test_clock, FixedClock, InMemoryRegistrationStore, RecordingMailer};
use std::sync::Arc;

pub(crate) type TestApp =
    FestivalApp<InMemoryRegistrationStore, MockCredentialStore, RecordingMailer>;

pub(crate) struct Harness {
    pub app: TestApp,
    pub store: InMemoryRegistrationStore,
    pub credentials: MockCredentialStore,
    pub mailer: RecordingMailer,
    pub clock: FixedClock,
}

pub(crate) fn mail_config() -> MailConfig {
    MailConfig {
        organizer_cc: "organizers@festival.example.edu".into(),
        festival_name: "Spring Fest".into(),
        notifications_from: "registrations@festival.example.edu".into(),
    }
}

pub(crate) fn auth_config() -> AuthConfig {
    AuthConfig {
        eo_jwt_secret: "eo-test-secret".into(),
        admin_jwt_secret: "admin-test-secret".into(),
        cookie_secure: false,
    }
}

pub(crate) fn app() -> Harness {
    let store = InMemoryRegistrationStore::new();
    let credentials = MockCredentialStore::new();
    let mailer = RecordingMailer::new();
    let clock = test_clock();

    let app = FestivalApp::new(
        EventRegistry::builtin(),
        store.clone(),
        credentials.clone(),
        mailer.clone(),
        Arc::new(clock.clone()),
        &auth_config(),
        mail_config(),
    );

    Harness {
        app,
        store,
        credentials,
        mailer,
        clock,
    }
}
