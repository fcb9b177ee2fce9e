//! Axum integration for the festival platform.
//!
//! This crate holds the HTTP plumbing shared by every router of the
//! platform:
//!
//! - [`AppError`]: the single handler error type, rendered as
//!   `{"success": false, "error", "code"}`, with conversions from domain
//!   errors
//! - The [`CorrelationId`] extractor
//! - The correlation id middleware that opens one tracing span per request
//! - Liveness and readiness handlers
//!
//! # Example
//!
//! ```
//! use axum::{routing::get, Json, Router};
//! use festival_web::{correlation_id_layer, health_check, AppError, CorrelationId};
//!
//! async fn handler(id: CorrelationId) -> Result<Json<String>, AppError> {
//!     tracing::info!(correlation_id = %id.0, "handling request");
//!     Ok(Json("done".to_string()))
//! }
//!
//! let app: Router = Router::new()
//!     .route("/health", get(health_check))
//!     .route("/work", get(handler))
//!     .layer(correlation_id_layer());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::CorrelationId;
pub use handlers::{health_check, readiness_check, ReadinessProbe};
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};
