//! Router harness backed by in-memory providers.

#![allow(dead_code, clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use festival::config::{AuthConfig, Config, MailConfig};
use festival::{build_router, AppState, FestivalApp};
use festival_auth::mocks::MockCredentialStore;
use festival_core::EventRegistry;
use festival_testing::{test_clock, FixedClock, InMemoryRegistrationStore, RecordingMailer};
use serde_json::Value;
use std::sync::Arc;

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryRegistrationStore,
    pub credentials: MockCredentialStore,
    pub mailer: RecordingMailer,
    pub clock: FixedClock,
}

pub fn test_app() -> TestApp {
    festival_testing::init_tracing();
    let store = InMemoryRegistrationStore::new();
    let credentials = MockCredentialStore::new();
    let mailer = RecordingMailer::new();
    let clock = test_clock();

    let auth = AuthConfig {
        eo_jwt_secret: "eo-integration-secret".into(),
        admin_jwt_secret: "admin-integration-secret".into(),
        cookie_secure: false,
    };
    let mail = MailConfig {
        organizer_cc: "organizers@festival.example.edu".into(),
        festival_name: "Spring Fest".into(),
        notifications_from: "registrations@festival.example.edu".into(),
    };
    let app = FestivalApp::new(
        EventRegistry::builtin(),
        store.clone(),
        credentials.clone(),
        mailer.clone(),
        Arc::new(clock.clone()),
        &auth,
        mail,
    );
    let server = Config::from_lookup(|_| None).server;
    let router = build_router(AppState::new(app, false), &server);

    TestApp {
        router,
        store,
        credentials,
        mailer,
        clock,
    }
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Request with an optional `Cookie` header.
pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// `name=value` pair from the response's `Set-Cookie` header.
pub fn session_cookie(response: &axum::response::Response) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    set_cookie.split(';').next().map(str::to_string)
}
