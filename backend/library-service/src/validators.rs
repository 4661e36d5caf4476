use once_cell::sync::Lazy;
use regex::Regex;

/// Input validation utilities for the library service

// Compile regex patterns once at startup
// These patterns are hardcoded and always valid, so we use expect() with explicit reasoning
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]{3,32}$")
        .expect("hardcoded username regex is invalid - fix source code")
});

static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9(][0-9 \-()]{6,19}$")
        .expect("hardcoded mobile regex is invalid - fix source code")
});

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Validate username format (3-32 characters, alphanumeric with - and _)
pub fn validate_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Validate mobile number format (digits with optional +, spaces, dashes, parentheses)
pub fn validate_mobile(mobile: &str) -> bool {
    MOBILE_REGEX.is_match(mobile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@sub.example.co.uk"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!validate_email("invalid"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
    }

    #[test]
    fn test_valid_username() {
        assert!(validate_username("john_doe"));
        assert!(validate_username("user-123"));
        assert!(validate_username("abc"));
    }

    #[test]
    fn test_invalid_username() {
        assert!(!validate_username("ab")); // Too short
        assert!(!validate_username(&"a".repeat(33))); // Too long
        assert!(!validate_username("user@name")); // Invalid character
    }

    #[test]
    fn test_valid_mobile() {
        assert!(validate_mobile("+44 7700 900123"));
        assert!(validate_mobile("0412345678"));
        assert!(validate_mobile("(02) 9999-1234"));
    }

    #[test]
    fn test_invalid_mobile() {
        assert!(!validate_mobile("12345")); // Too short
        assert!(!validate_mobile("not-a-number"));
        assert!(!validate_mobile(""));
    }
}
