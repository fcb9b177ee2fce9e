//! Public endpoints: event catalog and registration.
//!
//! - GET /api/events
//! - POST /api/register/:event_id

use super::json_body;
use crate::pipeline::CatalogEntry;
use crate::server::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use festival_auth::CredentialStore;
use festival_core::{Mailer, RegistrationForm, RegistrationStore};
use festival_web::AppError;
use serde::Serialize;
use uuid::Uuid;

/// Event catalog response.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// Always `true`.
    pub success: bool,
    /// Configured events.
    pub events: Vec<CatalogEntry>,
}

/// Registration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Always `true`.
    pub success: bool,
    /// Generated registration id.
    pub registration_id: Uuid,
    /// Confirmation message.
    pub message: String,
}

/// List the configured events.
#[allow(clippy::unused_async)]
pub async fn list_events<S, C, M>(State(state): State<AppState<S, C, M>>) -> Json<CatalogResponse>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    Json(CatalogResponse {
        success: true,
        events: state.app.catalog(),
    })
}

/// Register for an event.
///
/// ```text
/// POST /api/register/street-play
/// {"team_leader_name": "...", "team_leader_email": "a@x.com", "team_size": 3, "utr_number": "123456789012", ...}
/// ```
///
/// # Errors
///
/// 400 for validation errors and duplicates, 500 if the insert fails.
pub async fn register<S, C, M>(
    State(state): State<AppState<S, C, M>>,
    Path(event_id): Path<String>,
    payload: Result<Json<RegistrationForm>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    let form = json_body(payload)?;
    let registered = state.app.register(&event_id, form).await?;

    Ok(Json(RegisterResponse {
        success: true,
        registration_id: registered.registration_id,
        message: registered.message,
    }))
}
