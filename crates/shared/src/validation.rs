//! Common validation utilities for request bodies.

use validator::ValidationError;

lazy_static::lazy_static! {
    static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").unwrap();
    static ref USERNAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9_.@\-]{3,64}$").unwrap();
}

/// Minimum length for dashboard account passwords.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Statuses a monitored user or a dashboard account can have.
pub const ACCOUNT_STATUSES: &[&str] = &["active", "inactive"];

/// Roles a dashboard account can have.
pub const DASHBOARD_USER_TYPES: &[&str] = &["admin", "viewer"];

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates an account status ("active" or "inactive").
pub fn validate_status(status: &str) -> Result<(), ValidationError> {
    if ACCOUNT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(error("status", "Status must be 'active' or 'inactive'"))
    }
}

/// Validates a dashboard account type ("admin" or "viewer").
pub fn validate_dashboard_user_type(user_type: &str) -> Result<(), ValidationError> {
    if DASHBOARD_USER_TYPES.contains(&user_type) {
        Ok(())
    } else {
        Err(error("type", "Type must be 'admin' or 'viewer'"))
    }
}

/// Validates a loosely formatted phone number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(error("phone_format", "Invalid phone number"))
    }
}

/// Validates a dashboard username.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(error(
            "username_format",
            "Username must be 3-64 characters of letters, digits, '_', '.', '@' or '-'",
        ))
    }
}

/// Validates password length for dashboard accounts.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= MIN_PASSWORD_LENGTH {
        Ok(())
    } else {
        Err(error(
            "password_length",
            "Password must be at least 8 characters",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_status() {
        assert!(validate_status("active").is_ok());
        assert!(validate_status("inactive").is_ok());
        assert!(validate_status("Active").is_err());
        assert!(validate_status("deleted").is_err());
    }

    #[test]
    fn test_validate_dashboard_user_type() {
        assert!(validate_dashboard_user_type("admin").is_ok());
        assert!(validate_dashboard_user_type("viewer").is_ok());
        assert!(validate_dashboard_user_type("root").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+1 (555) 123-4567").is_ok());
        assert!(validate_phone("0301234567").is_ok());
        assert!(validate_phone("abc").is_err());
        assert!(validate_phone("12").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("ops.lead@corp").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
        let err = validate_password("short").unwrap_err();
        assert_eq!(err.code, "password_length");
    }
}
