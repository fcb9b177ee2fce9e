//! Signed session tokens.
//!
//! Tokens are HS256 JWTs holding the role claims, a scope, `iat` and `exp`
//! (24 hours after issue). Expiry is checked against an injected time rather
//! than the system clock so it can be tested deterministically.

use crate::claims::SessionClaims;
use crate::error::{AuthError, Result};
use chrono::{DateTime, Duration, Utc};
use festival_core::Clock;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Session lifetime.
pub const SESSION_TTL: Duration = Duration::hours(24);

/// Outcome of verifying a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionVerdict<C> {
    /// Signature, scope and expiry all check out.
    Valid(C),
    /// Correctly signed but past its expiry.
    Expired,
    /// Malformed, tampered with, or issued for another role.
    Invalid,
}

impl<C> SessionVerdict<C> {
    /// The claims if the token is valid.
    #[must_use]
    pub fn into_claims(self) -> Option<C> {
        match self {
            Self::Valid(claims) => Some(claims),
            Self::Expired | Self::Invalid => None,
        }
    }

    /// Whether the token is valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<C> {
    #[serde(flatten)]
    claims: C,
    scope: String,
    iat: i64,
    exp: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

/// Issues and verifies session tokens for one role.
///
/// Cheap to clone; clones share keys and clock.
///
/// # Example
///
/// ```
/// use festival_auth::{OrganizerClaims, SessionTokens, SessionVerdict};
/// use festival_core::SystemClock;
/// use std::sync::Arc;
///
/// let tokens = SessionTokens::<OrganizerClaims>::new(b"secret", Arc::new(SystemClock));
/// let claims = OrganizerClaims {
///     event_id: "hackathon".into(),
///     event_name: "24h Hackathon".into(),
///     table_name: "hackathon_registrations".into(),
/// };
///
/// let token = tokens.issue_now(&claims).unwrap();
/// assert_eq!(tokens.verify_now(&token), SessionVerdict::Valid(claims));
/// ```
pub struct SessionTokens<C> {
    keys: Arc<Keys>,
    clock: Arc<dyn Clock>,
    _claims: PhantomData<fn() -> C>,
}

impl<C> Clone for SessionTokens<C> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
            clock: Arc::clone(&self.clock),
            _claims: PhantomData,
        }
    }
}

impl<C: SessionClaims> fmt::Debug for SessionTokens<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("scope", &C::SCOPE)
            .finish_non_exhaustive()
    }
}

impl<C: SessionClaims> SessionTokens<C> {
    /// Create a token service signing with `secret`.
    #[must_use]
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                validation,
            }),
            clock,
            _claims: PhantomData,
        }
    }

    /// Sign `claims` as issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenSigning`] if the claims cannot be encoded.
    pub fn issue(&self, claims: &C, now: DateTime<Utc>) -> Result<String> {
        let envelope = Envelope {
            claims,
            scope: C::SCOPE.to_string(),
            iat: now.timestamp(),
            exp: (now + SESSION_TTL).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &envelope, &self.keys.encoding)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    /// Verify `token` as of `now`. Never fails; problems become a verdict.
    #[must_use]
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> SessionVerdict<C> {
        let envelope = match decode::<Envelope<C>>(token, &self.keys.decoding, &self.keys.validation)
        {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(scope = C::SCOPE, error = %e, "rejected session token");
                return SessionVerdict::Invalid;
            }
        };

        if envelope.scope != C::SCOPE {
            tracing::debug!(
                expected = C::SCOPE,
                actual = %envelope.scope,
                "session token scope mismatch"
            );
            return SessionVerdict::Invalid;
        }
        if envelope.exp <= now.timestamp() {
            return SessionVerdict::Expired;
        }

        SessionVerdict::Valid(envelope.claims)
    }

    /// [`issue`](Self::issue) at the current time of the service's clock.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenSigning`] if the claims cannot be encoded.
    pub fn issue_now(&self, claims: &C) -> Result<String> {
        self.issue(claims, self.clock.now())
    }

    /// [`verify`](Self::verify) at the current time of the service's clock.
    #[must_use]
    pub fn verify_now(&self, token: &str) -> SessionVerdict<C> {
        self.verify(token, self.clock.now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::claims::{AdminClaims, OrganizerClaims};
    use festival_testing::test_clock;

    fn organizer() -> OrganizerClaims {
        OrganizerClaims {
            event_id: "street-play".into(),
            event_name: "Nukkad Natak".into(),
            table_name: "street_play_registrations".into(),
        }
    }

    fn admin() -> AdminClaims {
        AdminClaims {
            admin_id: 1,
            username: "root".into(),
            role: "super_admin".into(),
        }
    }

    fn organizer_tokens(secret: &[u8]) -> SessionTokens<OrganizerClaims> {
        SessionTokens::new(secret, Arc::new(test_clock()))
    }

    #[test]
    fn test_round_trip_within_window() {
        let tokens = organizer_tokens(b"eo-secret");
        let issued = test_clock().now();
        let token = tokens.issue(&organizer(), issued).unwrap();

        let later = issued + Duration::hours(23) + Duration::minutes(59);
        assert_eq!(tokens.verify(&token, later), SessionVerdict::Valid(organizer()));
    }

    #[test]
    fn test_expired_after_24_hours() {
        let tokens = organizer_tokens(b"eo-secret");
        let issued = test_clock().now();
        let token = tokens.issue(&organizer(), issued).unwrap();

        assert_eq!(tokens.verify(&token, issued + SESSION_TTL), SessionVerdict::Expired);
        assert_eq!(
            tokens.verify(&token, issued + Duration::days(3)),
            SessionVerdict::Expired
        );
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let tokens = organizer_tokens(b"eo-secret");
        let now = test_clock().now();
        let token = tokens.issue(&organizer(), now).unwrap();

        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{unsigned}.{flipped}{}", &signature[1..]);

        assert_eq!(tokens.verify(&tampered, now), SessionVerdict::Invalid);
    }

    #[test]
    fn test_garbage_and_foreign_secret_are_invalid() {
        let tokens = organizer_tokens(b"eo-secret");
        let now = test_clock().now();
        assert_eq!(tokens.verify("not-a-token", now), SessionVerdict::Invalid);

        let other = organizer_tokens(b"another-secret");
        let token = other.issue(&organizer(), now).unwrap();
        assert_eq!(tokens.verify(&token, now), SessionVerdict::Invalid);
    }

    #[test]
    fn test_role_mismatch_is_invalid_even_with_shared_secret() {
        let admin_tokens: SessionTokens<AdminClaims> =
            SessionTokens::new(b"shared", Arc::new(test_clock()));
        let organizer_tokens = organizer_tokens(b"shared");
        let now = test_clock().now();

        let token = admin_tokens.issue(&admin(), now).unwrap();
        assert_eq!(organizer_tokens.verify(&token, now), SessionVerdict::Invalid);
        assert!(admin_tokens.verify(&token, now).is_valid());
    }

    #[test]
    fn test_clock_driven_expiry() {
        let clock = test_clock();
        let tokens: SessionTokens<AdminClaims> = SessionTokens::new(b"s", Arc::new(clock.clone()));
        let token = tokens.issue_now(&admin()).unwrap();
        assert!(tokens.verify_now(&token).is_valid());

        clock.advance(Duration::hours(24));
        assert_eq!(tokens.verify_now(&token), SessionVerdict::Expired);
    }
}
