//! Login identifier classification and masking helpers

use std::sync::OnceLock;

use regex::Regex;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap())
}

fn mobile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{10,15}$").unwrap())
}

/// Checks if the given string is shaped like an email address.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Checks if the given string is shaped like a mobile number (10-15 digits).
pub fn is_valid_mobile_number(mobile: &str) -> bool {
    mobile_regex().is_match(mobile)
}

/// Masks the local part of an email address for log output.
///
/// Operates on characters, not bytes; the input may be arbitrary
/// user-supplied text that has not passed shape validation yet.
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let keep = if local.chars().count() <= 2 { 1 } else { 2 };
        let prefix: String = local.chars().take(keep).collect();
        format!("{prefix}***{domain}")
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_classification() {
        assert!(is_valid_email("alice@x.com"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
        assert!(!is_valid_email("alice@x"));
        assert!(!is_valid_email("1234567890"));
    }

    #[test]
    fn test_mobile_classification() {
        assert!(is_valid_mobile_number("1234567890"));
        assert!(is_valid_mobile_number("919876543210"));
        assert!(!is_valid_mobile_number("12345"));
        assert!(!is_valid_mobile_number("alice@x.com"));
        assert!(!is_valid_mobile_number("12345678901234567"));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@x.com"), "al***@x.com");
        assert_eq!(mask_email("a@x.com"), "a***@x.com");
        assert_eq!(mask_email("@x.com"), "***@x.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_mask_email_multibyte_local_part() {
        assert_eq!(mask_email("é@x.com"), "é***@x.com");
        assert_eq!(mask_email("résumé@x.com"), "ré***@x.com");
    }
}
