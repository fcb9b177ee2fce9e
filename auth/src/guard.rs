//! Route guard for the back-office dashboards.
//!
//! The decision is a pure function of the path and the verdict on the
//! session cookie; the axum middleware only turns it into a response.

use crate::token::SessionVerdict;

/// Paths protected by one guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    /// Every path under this prefix is guarded.
    pub prefix: String,
    /// Login page, reachable without a session.
    pub login: String,
    /// Where an already signed-in user is sent from the login page.
    pub dashboard: String,
}

impl GuardPaths {
    /// Guard rooted at `prefix` with `login` and `dashboard` pages below it.
    #[must_use]
    pub fn under(prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        Self {
            prefix: prefix.to_string(),
            login: format!("{prefix}/login"),
            dashboard: format!("{prefix}/dashboard"),
        }
    }

    /// Organizer back-office.
    #[must_use]
    pub fn organizer() -> Self {
        Self::under("/organizer")
    }

    /// Admin back-office.
    #[must_use]
    pub fn admin() -> Self {
        Self::under("/admin")
    }

    /// Whether `path` falls under the guarded prefix.
    #[must_use]
    pub fn covers(&self, path: &str) -> bool {
        path == self.prefix
            || path
                .strip_prefix(&self.prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    fn is_login(&self, path: &str) -> bool {
        path.trim_end_matches('/') == self.login
    }
}

/// What the guard wants done with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through.
    Allow,
    /// Redirect to the target.
    Redirect(String),
    /// Redirect to the target and delete the session cookie.
    RedirectAndClear(String),
}

/// Decide what to do with a request for `path`.
///
/// `verdict` is `None` when the request carries no session cookie.
///
/// # Examples
///
/// ```
/// use festival_auth::guard::{guard, GuardDecision, GuardPaths};
/// use festival_auth::SessionVerdict;
///
/// let paths = GuardPaths::organizer();
/// let none: Option<&SessionVerdict<()>> = None;
///
/// assert_eq!(
///     guard(&paths, "/organizer/dashboard", none),
///     GuardDecision::Redirect("/organizer/login".into())
/// );
/// assert_eq!(guard(&paths, "/organizer/login", none), GuardDecision::Allow);
/// assert_eq!(guard(&paths, "/register", none), GuardDecision::Allow);
/// ```
#[must_use]
pub fn guard<C>(paths: &GuardPaths, path: &str, verdict: Option<&SessionVerdict<C>>) -> GuardDecision {
    if !paths.covers(path) {
        return GuardDecision::Allow;
    }

    let valid = verdict.is_some_and(SessionVerdict::is_valid);

    if paths.is_login(path) {
        return if valid {
            GuardDecision::Redirect(paths.dashboard.clone())
        } else {
            GuardDecision::Allow
        };
    }

    match verdict {
        None => GuardDecision::Redirect(paths.login.clone()),
        Some(_) if valid => GuardDecision::Allow,
        Some(_) => GuardDecision::RedirectAndClear(paths.login.clone()),
    }
}
