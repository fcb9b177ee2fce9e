//! HTTP handlers.
//!
//! Handlers translate requests into [`FestivalApp`](crate::pipeline::FestivalApp)
//! calls and results into camelCase JSON bodies carrying `success`.

pub mod admin;
pub mod organizer;
pub mod public;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use festival_web::AppError;
use serde::Serialize;

/// Unwrap a JSON body, reporting malformed input as 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

/// Decoded session claims.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse<C> {
    /// Always `true`.
    pub success: bool,
    /// Claims of the current session.
    #[serde(flatten)]
    pub session: C,
}

impl<C> SessionResponse<C> {
    const fn of(session: C) -> Self {
        Self {
            success: true,
            session,
        }
    }
}
