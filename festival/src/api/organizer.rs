//! Event organizer endpoints.
//!
//! - POST /api/organizer/login
//! - POST /api/organizer/logout
//! - GET /api/organizer/session
//! - GET /api/organizer/registrations
//! - POST /api/organizer/check-in

use super::{json_body, SessionResponse};
use crate::pipeline::{CheckInOutcome, LoginRequest};
use crate::server::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use festival_auth::{
    clear_cookie, session_cookie, CredentialStore, OrganizerClaims, OrganizerSession, Session,
    ORGANIZER_COOKIE,
};
use festival_core::{Mailer, Registration, RegistrationStore};
use festival_web::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Organizer login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Always `true`.
    pub success: bool,
    /// Event the organizer manages.
    pub event_id: String,
    /// Event display name.
    pub event_name: String,
}

/// Registrations of the organizer's event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationsResponse {
    /// Always `true`.
    pub success: bool,
    /// Event id.
    pub event_id: String,
    /// Event display name.
    pub event_name: String,
    /// Rows, newest first.
    pub registrations: Vec<Registration>,
}

/// Check-in request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    /// Scanned registration id.
    #[serde(alias = "registration_id", alias = "id")]
    pub registration_id: String,
}

/// Log an organizer in and set the `eo_session` cookie.
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
    let login = state.app.login_organizer(&request).await?;
    let cookie = session_cookie(ORGANIZER_COOKIE, login.token, state.cookie_secure);

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(LoginResponse {
            success: true,
            event_id: login.claims.event_id,
            event_name: login.claims.event_name,
        }),
    )
        .into_response())
}

/// Clear the `eo_session` cookie.
#[allow(clippy::unused_async)]
pub async fn logout<S, C, M>(State(state): State<AppState<S, C, M>>) -> Response {
    let cookie = clear_cookie(ORGANIZER_COOKIE, state.cookie_secure);
    (
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Claims of the current organizer session.
#[allow(clippy::unused_async)]
pub async fn session(Session(claims): OrganizerSession) -> Json<SessionResponse<OrganizerClaims>> {
    Json(SessionResponse::of(claims))
}

/// List the registrations of the organizer's event.
///
/// # Errors
///
/// 401 without a session, 500 if the query fails.
pub async fn registrations<S, C, M>(
    State(state): State<AppState<S, C, M>>,
    Session(claims): OrganizerSession,
) -> Result<Json<RegistrationsResponse>, AppError>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    let registrations = state.app.organizer_registrations(&claims).await?;
    Ok(Json(RegistrationsResponse {
        success: true,
        event_id: claims.event_id,
        event_name: claims.event_name,
        registrations,
    }))
}

/// Check a registration in.
///
/// 200 on first check-in, 409 with the existing row when already checked
/// in, 404 when the id is not in the organizer's table.
///
/// # Errors
///
/// 401 without a session, 500 if a storage call fails.
pub async fn check_in<S, C, M>(
    State(state): State<AppState<S, C, M>>,
    Session(claims): OrganizerSession,
    payload: Result<Json<CheckInRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    let request = json_body(payload)?;
    match state.app.check_in(&claims, &request.registration_id).await? {
        CheckInOutcome::CheckedIn(registration) => Ok(Json(json!({
            "success": true,
            "message": format!("{} checked in", registration.name),
            "registration": registration,
        }))
        .into_response()),
        CheckInOutcome::AlreadyCheckedIn(registration) => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "alreadyCheckedIn": true,
                "error": "Already checked in",
                "registration": registration,
            })),
        )
            .into_response()),
        CheckInOutcome::NotFound => Err(AppError::not_found("Registration not found")),
    }
}
