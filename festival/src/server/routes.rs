//! Router configuration for the festival service.

use super::state::AppState;
use crate::api::{admin, organizer, public};
use crate::config::ServerConfig;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use festival_auth::{enforce, AdminClaims, CredentialStore, GuardPaths, OrganizerClaims, RouteGuard};
use festival_core::{Mailer, RegistrationStore};
use festival_web::{correlation_id_layer, health_check, readiness_check};
use std::path::Path;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// - Health checks
/// - Public catalog and registration
/// - Organizer API (login, session, listing, check-in)
/// - Admin API (login, session, listing, status updates, stats)
/// - Static site from `STATIC_DIR`, with `/organizer/*` and `/admin/*`
///   behind the route guards
pub fn build_router<S, C, M>(state: AppState<S, C, M>, config: &ServerConfig) -> Router
where
    S: RegistrationStore + 'static,
    C: CredentialStore + 'static,
    M: Mailer + 'static,
{
    let organizer_guard = RouteGuard::new(
        GuardPaths::organizer(),
        state.app.organizer_tokens.clone(),
        state.cookie_secure,
    );
    let admin_guard = RouteGuard::new(
        GuardPaths::admin(),
        state.app.admin_tokens.clone(),
        state.cookie_secure,
    );

    let organizer_api = Router::new()
        .route("/login", post(organizer::login::<S, C, M>))
        .route("/logout", post(organizer::logout::<S, C, M>))
        .route("/session", get(organizer::session))
        .route("/registrations", get(organizer::registrations::<S, C, M>))
        .route("/check-in", post(organizer::check_in::<S, C, M>));

    let admin_api = Router::new()
        .route("/login", post(admin::login::<S, C, M>))
        .route("/logout", post(admin::logout::<S, C, M>))
        .route("/session", get(admin::session))
        .route("/registrations", get(admin::registrations::<S, C, M>))
        .route("/update-status", post(admin::update_status::<S, C, M>))
        .route("/events", get(admin::events::<S, C, M>));

    let api = Router::new()
        .route("/events", get(public::list_events::<S, C, M>))
        .route("/register/:event_id", post(public::register::<S, C, M>))
        .nest("/organizer", organizer_api)
        .nest("/admin", admin_api);

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check::<AppState<S, C, M>>))
        .nest("/api", api);

    if let Some(dir) = &config.static_dir {
        router = static_site(router, dir);
    }

    let mut router = router
        .layer(from_fn_with_state(organizer_guard, enforce::<OrganizerClaims>))
        .layer(from_fn_with_state(admin_guard, enforce::<AdminClaims>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer());

    if let Some(cors) = cors_layer(&config.cors_origins) {
        router = router.layer(cors);
    }
    router
}

/// Dashboard pages by clean URL, everything else straight from the
/// directory.
fn static_site<S>(router: Router<S>, dir: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let pages = [
        ("/organizer/login", "organizer/login.html"),
        ("/organizer/dashboard", "organizer/dashboard.html"),
        ("/admin/login", "admin/login.html"),
        ("/admin/dashboard", "admin/dashboard.html"),
    ];
    let router = pages.into_iter().fold(router, |router, (path, file)| {
        router.route_service(path, ServeFile::new(dir.join(file)))
    });
    router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
}

/// Credentialed CORS for the configured origins; `None` when there are none.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
