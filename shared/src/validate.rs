use once_cell::sync::Lazy;
use regex::Regex;

/// Username shape accepted everywhere except the injectable login.
pub static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_]{3,32}$").expect("username pattern is a valid regex")
});

pub fn is_valid_username(candidate: &str) -> bool {
    USERNAME_PATTERN.is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::LoginRequest;
    use rstest::rstest;
    use validator::Validate;

    #[rstest]
    #[case("alice")]
    #[case("bob")]
    #[case("Charlie_99")]
    #[case("abc")]
    #[case("a_very_long_username_of_32_chars")]
    fn accepts_well_formed_usernames(#[case] name: &str) {
        assert!(is_valid_username(name));
    }

    #[rstest]
    #[case("")]
    #[case("ab")]
    #[case("a_very_long_username_of_33_chars_")]
    #[case("alice'--")]
    #[case("bob or 1=1")]
    #[case("ümlaut")]
    #[case("alice\n")]
    fn rejects_malformed_usernames(#[case] name: &str) {
        assert!(!is_valid_username(name));
    }

    #[test]
    fn login_request_bounds_password_length() {
        let mut req = LoginRequest {
            username: "alice".into(),
            password: "ab".into(),
        };
        assert!(req.validate().is_err());
        req.password = "it's fine".into();
        assert!(req.validate().is_ok());
        req.password = "p".repeat(129);
        assert!(req.validate().is_err());
    }

    #[test]
    fn login_request_rejects_injection_shaped_username() {
        let req = LoginRequest {
            username: "' OR '1'='1".into(),
            password: "whatever".into(),
        };
        assert!(req.validate().is_err());
    }
}
