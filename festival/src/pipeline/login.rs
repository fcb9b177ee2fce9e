//! Back-office login for organizers and admins.

use super::{FestivalApp, PipelineError};
use crate::metrics;
use festival_auth::{verify_password, AdminClaims, AuthError, CredentialStore, OrganizerClaims};
use festival_core::{Mailer, RegistrationStore};
use serde::Deserialize;
use tracing::{info, warn};

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Username, matched case-insensitively.
    #[serde(default)]
    pub username: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    fn credentials(&self) -> Result<(&str, &str), AuthError> {
        let username = self.username.as_deref().map(str::trim).unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok((username, password))
    }
}

/// Successful organizer login.
#[derive(Debug, Clone)]
pub struct OrganizerLogin {
    /// Signed session token for the `eo_session` cookie.
    pub token: String,
    /// Claims carried by the token.
    pub claims: OrganizerClaims,
}

/// Successful admin login.
#[derive(Debug, Clone)]
pub struct AdminLogin {
    /// Signed session token for the `admin_session` cookie.
    pub token: String,
    /// Claims carried by the token.
    pub claims: AdminClaims,
}

/// Argon2 verification is CPU-bound.
async fn password_matches(password: &str, hash: &str) -> bool {
    let (password, hash) = (password.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}

fn login_outcome<T>(result: &Result<T, PipelineError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(err) if err.is_user_error() => "rejected",
        Err(_) => "failed",
    }
}

impl<S, C, M> FestivalApp<S, C, M>
where
    S: RegistrationStore,
    C: CredentialStore,
    M: Mailer,
{
    /// Log an event organizer in.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Username or password is missing
    /// - The account is unknown or inactive, or the password is wrong
    /// - The account's event is not configured
    /// - The lookup or token signing fails
    #[tracing::instrument(skip(self, request))]
    pub async fn login_organizer(&self, request: &LoginRequest) -> Result<OrganizerLogin, PipelineError> {
        let result = self.run_organizer_login(request).await;
        metrics::record_login("organizer", login_outcome(&result));
        result
    }

    async fn run_organizer_login(&self, request: &LoginRequest) -> Result<OrganizerLogin, PipelineError> {
        let (username, password) = request.credentials()?;

        let account = self
            .credentials
            .find_organizer(username)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AuthError::InvalidCredentials)?;
        if !password_matches(password, &account.password_hash).await {
            return Err(AuthError::InvalidCredentials.into());
        }

        let event = self
            .registry
            .get(&account.event_id)
            .ok_or_else(|| AuthError::UnknownEvent(account.event_id.clone()))?;
        let claims = OrganizerClaims {
            event_id: event.id.clone(),
            event_name: event.name.clone(),
            table_name: event.table_name.clone(),
        };
        let token = self.organizer_tokens.issue_now(&claims)?;

        if let Err(e) = self
            .credentials
            .touch_organizer_login(account.id, self.clock.now())
            .await
        {
            warn!(account_id = account.id, error = %e, "failed to record organizer login");
        }
        info!(account_id = account.id, event = %claims.event_id, "organizer logged in");

        Ok(OrganizerLogin { token, claims })
    }

    /// Log an admin in.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Username or password is missing
    /// - The account is unknown or inactive, or the password is wrong
    /// - The lookup or token signing fails
    #[tracing::instrument(skip(self, request))]
    pub async fn login_admin(&self, request: &LoginRequest) -> Result<AdminLogin, PipelineError> {
        let result = self.run_admin_login(request).await;
        metrics::record_login("admin", login_outcome(&result));
        result
    }

    async fn run_admin_login(&self, request: &LoginRequest) -> Result<AdminLogin, PipelineError> {
        let (username, password) = request.credentials()?;

        let account = self
            .credentials
            .find_admin(username)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AuthError::InvalidCredentials)?;
        if !password_matches(password, &account.password_hash).await {
            return Err(AuthError::InvalidCredentials.into());
        }

        let claims = AdminClaims {
            admin_id: account.id,
            username: account.username.clone(),
            role: account.role.clone(),
        };
        let token = self.admin_tokens.issue_now(&claims)?;

        if let Err(e) = self
            .credentials
            .touch_admin_login(account.id, self.clock.now())
            .await
        {
            warn!(account_id = account.id, error = %e, "failed to record admin login");
        }
        info!(account_id = account.id, role = %claims.role, "admin logged in");

        Ok(AdminLogin { token, claims })
    }
}
