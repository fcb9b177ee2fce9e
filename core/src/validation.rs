//! Field validation helpers.

/// Validate email address format.
///
/// This performs basic RFC 5322 validation:
/// - Must contain exactly one `@`
/// - Must have non-empty local and domain parts
/// - Length must be between 3 and 255 characters
///
/// # Examples
///
/// ```
/// use festival_core::validation::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("user+tag@subdomain.example.com"));
/// assert!(!is_valid_email("invalid"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("user@"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    let valid_local_chars =
        |c: char| c.is_alphanumeric() || c == '.' || c == '-' || c == '+' || c == '_';
    let valid_domain_chars = |c: char| c.is_alphanumeric() || c == '.' || c == '-';

    if !local.chars().all(valid_local_chars) || !domain.chars().all(valid_domain_chars) {
        return false;
    }

    domain.split('.').all(|part| !part.is_empty())
}

/// Normalize a phone number to its ten national digits.
///
/// Spaces, dashes and a leading `+91`/`91`/`0` prefix are removed. Returns
/// `None` unless exactly ten digits remain.
///
/// # Examples
///
/// ```
/// use festival_core::validation::normalize_phone;
///
/// assert_eq!(normalize_phone("+91 98765-43210").as_deref(), Some("9876543210"));
/// assert_eq!(normalize_phone("09876543210").as_deref(), Some("9876543210"));
/// assert_eq!(normalize_phone("12345"), None);
/// ```
#[must_use]
pub fn normalize_phone(phone: &str) -> Option<String> {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let national = match digits.len() {
        10 => digits,
        11 => digits.strip_prefix('0')?,
        12 => digits.strip_prefix("91")?,
        _ => return None,
    };

    Some(national.to_string())
}

/// A UTR (unique transaction reference) is exactly twelve ASCII digits.
///
/// # Examples
///
/// ```
/// use festival_core::validation::is_valid_utr;
///
/// assert!(is_valid_utr("123456789012"));
/// assert!(!is_valid_utr("12345678901"));
/// assert!(!is_valid_utr("12345678901a"));
/// ```
#[must_use]
pub fn is_valid_utr(utr: &str) -> bool {
    utr.len() == 12 && utr.bytes().all(|b| b.is_ascii_digit())
}

/// Whether a string can be used unquoted as a Postgres table name.
///
/// Lower-case ASCII letters, digits and underscores, not starting with a
/// digit, at most 63 bytes.
#[must_use]
pub fn is_safe_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    name.len() <= 63
        && (first.is_ascii_lowercase() || first == b'_')
        && bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn test_email_length_limits() {
        assert!(is_valid_email("a@b.c"));
        let long_email = format!("{}@example.com", "a".repeat(250));
        assert!(!is_valid_email(&long_email));
    }

    #[test]
    fn test_phone_rejects_letters_and_wrong_prefix() {
        assert_eq!(normalize_phone("98765x3210"), None);
        assert_eq!(normalize_phone("449876543210"), None);
        assert_eq!(normalize_phone(""), None);
    }

    #[test]
    fn test_safe_identifier() {
        assert!(is_safe_identifier("street_play_registrations"));
        assert!(is_safe_identifier("_t1"));
        assert!(!is_safe_identifier("1table"));
        assert!(!is_safe_identifier("Street"));
        assert!(!is_safe_identifier("a-b"));
        assert!(!is_safe_identifier(""));
        assert!(!is_safe_identifier(&"a".repeat(64)));
    }

    proptest! {
        #[test]
        fn utr_accepts_any_twelve_digits(utr in "[0-9]{12}") {
            prop_assert!(is_valid_utr(&utr));
        }

        #[test]
        fn utr_rejects_other_lengths(utr in "[0-9]{0,11}|[0-9]{13,20}") {
            prop_assert!(!is_valid_utr(&utr));
        }

        #[test]
        fn phone_normalization_is_idempotent(digits in "[6-9][0-9]{9}") {
            let normalized = normalize_phone(&digits);
            prop_assert_eq!(normalized.as_deref(), Some(digits.as_str()));
        }
    }
}
