//! Session cookie helpers.

use cookie::{Cookie, SameSite};
use http::{header, HeaderMap};

/// Build the cookie that carries a freshly issued session token.
///
/// http-only, `SameSite=Lax`, scoped to `/`, expiring with the token.
#[must_use]
pub fn session_cookie(name: &str, token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::hours(24))
        .build()
}

/// Build a cookie that deletes the session cookie `name`.
#[must_use]
pub fn clear_cookie(name: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::ZERO)
        .build()
}

/// Read cookie `name` from the request's `Cookie` headers.
#[must_use]
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_session_cookie_attributes() {
        let rendered = session_cookie("eo_session", "abc".into(), false).to_string();
        assert!(rendered.starts_with("eo_session=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=86400"));
        assert!(!rendered.contains("Secure"));

        assert!(session_cookie("eo_session", "abc".into(), true)
            .to_string()
            .contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let rendered = clear_cookie("admin_session", false).to_string();
        assert!(rendered.starts_with("admin_session=;"));
        assert!(rendered.contains("Max-Age=0"));
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; eo_session=tok123"),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("admin_session=adm"));

        assert_eq!(read_cookie(&headers, "eo_session").as_deref(), Some("tok123"));
        assert_eq!(read_cookie(&headers, "admin_session").as_deref(), Some("adm"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_empty_cookie_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("eo_session="));
        assert_eq!(read_cookie(&headers, "eo_session"), None);
    }
}
