//! End-to-end session flow: credential check, token issue, guard decision.

#![allow(clippy::unwrap_used)]

use chrono::Duration;
use festival_auth::mocks::MockCredentialStore;
use festival_auth::{
    guard, verify_password, AdminClaims, CredentialStore, GuardDecision, GuardPaths,
    OrganizerClaims, SessionTokens, SessionVerdict,
};
use festival_testing::test_clock;
use std::sync::Arc;

#[tokio::test]
async fn organizer_login_grants_dashboard_for_a_day() {
    let clock = test_clock();
    let store = MockCredentialStore::new();
    store.add_organizer("hack_eo", "s3cret", "hackathon").unwrap();

    let account = store.find_organizer("HACK_EO").await.unwrap().unwrap();
    assert!(verify_password("s3cret", &account.password_hash));
    assert!(!verify_password("wrong", &account.password_hash));

    let tokens = SessionTokens::<OrganizerClaims>::new(b"eo-secret", Arc::new(clock.clone()));
    let token = tokens
        .issue_now(&OrganizerClaims {
            event_id: account.event_id.clone(),
            event_name: "24h Hackathon".into(),
            table_name: "hackathon_registrations".into(),
        })
        .unwrap();

    let paths = GuardPaths::organizer();
    let verdict = tokens.verify_now(&token);
    assert_eq!(
        guard(&paths, "/organizer/dashboard", Some(&verdict)),
        GuardDecision::Allow
    );

    clock.advance(Duration::hours(24));
    let verdict = tokens.verify_now(&token);
    assert_eq!(verdict, SessionVerdict::Expired);
    assert_eq!(
        guard(&paths, "/organizer/dashboard", Some(&verdict)),
        GuardDecision::RedirectAndClear("/organizer/login".into())
    );
}

#[tokio::test]
async fn admin_token_does_not_open_organizer_pages() {
    let clock = Arc::new(test_clock());
    let organizer = SessionTokens::<OrganizerClaims>::new(b"eo-secret", clock.clone());
    let admin = SessionTokens::<AdminClaims>::new(b"admin-secret", clock);

    let token = admin
        .issue_now(&AdminClaims {
            admin_id: 1,
            username: "root".into(),
            role: "super_admin".into(),
        })
        .unwrap();

    let verdict = organizer.verify_now(&token);
    assert_eq!(verdict, SessionVerdict::Invalid);
    assert_eq!(
        guard(&GuardPaths::organizer(), "/organizer/dashboard", Some(&verdict)),
        GuardDecision::RedirectAndClear("/organizer/login".into())
    );
}

#[tokio::test]
async fn inactive_accounts_are_still_found_but_flagged() {
    let store = MockCredentialStore::new();
    store.add_organizer("band_eo", "pw", "battle-of-bands").unwrap();
    store.set_organizer_active("band_eo", false);

    let account = store.find_organizer("band_eo").await.unwrap().unwrap();
    assert!(!account.is_active);
}
