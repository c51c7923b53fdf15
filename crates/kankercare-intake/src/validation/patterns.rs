//! Fixed patterns shared by the rule sets

use std::sync::LazyLock;

use regex::Regex;

/// Letters and whitespace only
pub static NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name pattern"));

/// Indonesian mobile numbers: `+62`, `62` or `0`, then `8`, then 7-11 digits
pub static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+62|62|0)8[1-9][0-9]{6,10}$").expect("valid phone pattern"));

pub static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Whitespace inside the number is ignored
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE.is_match(&compact)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// At least one lowercase ASCII letter, one uppercase ASCII letter and one digit
pub fn has_password_complexity(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_prefixes() {
        assert!(is_valid_phone("08123456789"));
        assert!(is_valid_phone("+628123456789"));
        assert!(is_valid_phone("628123456789"));
        assert!(is_valid_phone("0812 3456 789"));
    }

    #[test]
    fn test_phone_rejections() {
        assert!(!is_valid_phone("1234567890"));
        assert!(!is_valid_phone("0712345678"));
        assert!(!is_valid_phone("0801234567"));
        // 8 + 6 digits is one short, 8 + 12 digits one too many
        assert!(!is_valid_phone("0812345"));
        assert!(!is_valid_phone("08123456789012"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_password_complexity() {
        assert!(!has_password_complexity("abcdefgh"));
        assert!(!has_password_complexity("ABCDEFG1"));
        assert!(!has_password_complexity("Abcdefgh"));
        assert!(has_password_complexity("Abcdef12"));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("nama@email.com"));
        assert!(!is_valid_email("nama@email"));
        assert!(!is_valid_email("nama email@x.com"));
        assert!(!is_valid_email("@x.com"));
    }

    #[test]
    fn test_name_chars() {
        assert!(NAME_CHARS.is_match("Budi Santoso"));
        assert!(!NAME_CHARS.is_match("Budi123"));
        assert!(!NAME_CHARS.is_match("O'Brien"));
    }
}
