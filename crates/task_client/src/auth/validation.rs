use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ClientError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex");
}

/// Field checks run before a registration request is dispatched. A failure
/// here means nothing goes over the wire.
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ClientError> {
    if username.trim().chars().count() < 3 {
        return Err(ClientError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ClientError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    if password.chars().count() < 8 {
        return Err(ClientError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    Ok(())
}

/// Login only needs both fields filled in; the server decides the rest.
pub fn validate_login(email: &str, password: &str) -> Result<(), ClientError> {
    if email.trim().is_empty() {
        return Err(ClientError::Validation(
            "Please enter your email address".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(ClientError::Validation(
            "Please enter your password".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), ClientError>) -> String {
        match result {
            Err(ClientError::Validation(message)) => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_well_formed_registration() {
        assert!(validate_registration("ada", "ada@example.com", "longenough").is_ok());
    }

    #[test]
    fn rejects_short_usernames() {
        let message = message(validate_registration("ab", "ada@example.com", "longenough"));
        assert!(message.contains("Username"));
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["not-an-email", "a@b", "a b@c.d", "@example.com"] {
            let message = message(validate_registration("ada", email, "longenough"));
            assert!(message.contains("email"), "email {email:?} should be rejected");
        }
    }

    #[test]
    fn rejects_short_passwords() {
        let message = message(validate_registration("ada", "ada@example.com", "short"));
        assert!(message.contains("Password"));
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login("ada@example.com", "secret").is_ok());
        assert!(validate_login("", "secret").is_err());
        assert!(validate_login("ada@example.com", "").is_err());
    }
}
