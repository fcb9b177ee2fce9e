//! Admin endpoints.
//!
//! - POST /api/admin/login
//! - POST /api/admin/logout
//! - GET /api/admin/session
//! - GET /api/admin/registrations?event=<id|all>
//! - POST /api/admin/update-status
//! - GET /api/admin/events

use super::{json_body, SessionResponse};
use crate::pipeline::{EventFilter, EventSummary, ListedRegistration, LoginRequest, StatusUpdate};
use crate::server::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use festival_auth::{
    clear_cookie, session_cookie, AdminClaims, AdminSession, CredentialStore, Session,
    ADMIN_COOKIE,
};
use festival_core::{Mailer, RegistrationStore};
use festival_web::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Admin login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Always `true`.
    pub success: bool,
    /// Admin role.
    pub role: String,
}

/// Query of the registrations listing.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationsQuery {
    /// Event id, or `all`.
    pub event: Option<String>,
}

/// Registrations listing.
#[derive(Debug, Serialize)]
pub struct RegistrationsResponse {
    /// Always `true`.
    pub success: bool,
    /// Rows, newest first.
    pub registrations: Vec<ListedRegistration>,
}

/// Status update response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    /// Always `true`.
    pub success: bool,
    /// Confirmation message.
    pub message: &'static str,
    /// Whether a notice went out.
    pub email_sent: bool,
}

/// Per-event statistics.
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    /// Always `true`, even when some tables could not be read.
    pub success: bool,
    /// One entry per configured event.
    pub events: Vec<EventSummary>,
}

/// Log an admin in and set the `admin_session` cookie.
///
/// # Errors
///
/// 400 if a field is missing, 401 for bad credentials.
pub async fn login<S, C, M>(
    State(state): State<AppState<S, C, M>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    let request = json_body(payload)?;
    let login = state.app.login_admin(&request).await?;
    let cookie = session_cookie(ADMIN_COOKIE, login.token, state.cookie_secure);

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(LoginResponse {
            success: true,
            role: login.claims.role,
        }),
    )
        .into_response())
}

/// Clear the `admin_session` cookie.
#[allow(clippy::unused_async)]
pub async fn logout<S, C, M>(State(state): State<AppState<S, C, M>>) -> Response {
    let cookie = clear_cookie(ADMIN_COOKIE, state.cookie_secure);
    (
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Claims of the current admin session.
#[allow(clippy::unused_async)]
pub async fn session(Session(claims): AdminSession) -> Json<SessionResponse<AdminClaims>> {
    Json(SessionResponse::of(claims))
}

/// List registrations of one event or of all events.
///
/// # Errors
///
/// 401 without a session, 400 for an unknown event, 500 if a single-event
/// query fails.
pub async fn registrations<S, C, M>(
    State(state): State<AppState<S, C, M>>,
    Session(_admin): AdminSession,
    Query(query): Query<RegistrationsQuery>,
) -> Result<Json<RegistrationsResponse>, AppError>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    let filter = EventFilter::parse(query.event.as_deref());
    let registrations = state.app.admin_registrations(&filter).await?;
    Ok(Json(RegistrationsResponse {
        success: true,
        registrations,
    }))
}

/// Update a registration's status and optionally notify the participant.
///
/// # Errors
///
/// 401 without a session, 400 for an unknown table, 404 for an unknown
/// registration, 500 if the update fails.
pub async fn update_status<S, C, M>(
    State(state): State<AppState<S, C, M>>,
    Session(admin): AdminSession,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<UpdateStatusResponse>, AppError>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    let update = json_body(payload)?;
    let updated = state.app.update_status(&admin, update).await?;
    Ok(Json(UpdateStatusResponse {
        success: true,
        message: "Status updated successfully",
        email_sent: updated.email_sent,
    }))
}

/// Aggregate counts for every event.
pub async fn events<S, C, M>(
    State(state): State<AppState<S, C, M>>,
    Session(_admin): AdminSession,
) -> Json<EventsResponse>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    Json(EventsResponse {
        success: true,
        events: state.app.event_stats().await,
    })
}
