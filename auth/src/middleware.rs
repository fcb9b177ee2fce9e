//! Axum integration: session extractors and the route guard middleware.

use crate::claims::{AdminClaims, OrganizerClaims, SessionClaims};
use crate::cookies::{clear_cookie, read_cookie};
use crate::guard::{guard, GuardDecision, GuardPaths};
use crate::token::{SessionTokens, SessionVerdict};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, OriginalUri, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use festival_web::AppError;
use std::sync::Arc;

/// Verified session claims of role `C`.
///
/// Rejects with 401 when the role cookie is missing, expired or invalid, so
/// a handler taking this extractor never runs unauthenticated.
#[derive(Debug, Clone)]
pub struct Session<C>(pub C);

/// Organizer session extractor.
pub type OrganizerSession = Session<OrganizerClaims>;

/// Admin session extractor.
pub type AdminSession = Session<AdminClaims>;

#[async_trait]
impl<S, C> FromRequestParts<S> for Session<C>
where
    S: Send + Sync,
    C: SessionClaims,
    SessionTokens<C>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = SessionTokens::<C>::from_ref(state);
        let token = read_cookie(&parts.headers, C::COOKIE)
            .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

        match tokens.verify_now(&token) {
            SessionVerdict::Valid(claims) => Ok(Self(claims)),
            SessionVerdict::Expired => Err(AppError::unauthorized("Session expired")),
            SessionVerdict::Invalid => Err(AppError::unauthorized("Invalid session")),
        }
    }
}

/// State of one route guard middleware.
pub struct RouteGuard<C> {
    paths: Arc<GuardPaths>,
    tokens: SessionTokens<C>,
    secure_cookies: bool,
}

impl<C: SessionClaims> std::fmt::Debug for RouteGuard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("paths", &self.paths)
            .field("tokens", &self.tokens)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl<C> Clone for RouteGuard<C> {
    fn clone(&self) -> Self {
        Self {
            paths: Arc::clone(&self.paths),
            tokens: self.tokens.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

impl<C: SessionClaims> RouteGuard<C> {
    /// Guard `paths` with tokens verified by `tokens`.
    #[must_use]
    pub fn new(paths: GuardPaths, tokens: SessionTokens<C>, secure_cookies: bool) -> Self {
        Self {
            paths: Arc::new(paths),
            tokens,
            secure_cookies,
        }
    }
}

/// Middleware applying a [`RouteGuard`].
///
/// Install with `axum::middleware::from_fn_with_state(guard, enforce::<C>)`.
/// Redirects are `303 See Other`.
pub async fn enforce<C: SessionClaims>(
    State(route_guard): State<RouteGuard<C>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path(), |uri| uri.0.path())
        .to_string();

    if !route_guard.paths.covers(&path) {
        return next.run(request).await;
    }

    let verdict = read_cookie(request.headers(), C::COOKIE)
        .map(|token| route_guard.tokens.verify_now(&token));

    match guard(&route_guard.paths, &path, verdict.as_ref()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(target) => {
            tracing::debug!(%path, %target, scope = C::SCOPE, "guard redirect");
            Redirect::to(&target).into_response()
        }
        GuardDecision::RedirectAndClear(target) => {
            tracing::debug!(%path, %target, scope = C::SCOPE, "guard redirect, clearing session");
            let mut response = Redirect::to(&target).into_response();
            let cookie = clear_cookie(C::COOKIE, route_guard.secure_cookies);
            if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            response
        }
    }
}
