// ── Pre-flight validation ──
//
// Checks that run before any request is sent. Failures are
// `CoreError::ValidationFailed` and never reach the backend.

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

/// Shortest password accepted on register, login and user update.
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_password(password: &SecretString) -> Result<(), CoreError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// A required text field must contain something other than whitespace.
pub fn require_field(label: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{label} is required")));
    }
    Ok(())
}

/// Minimal shape check for alert recipient addresses.
pub fn validate_email(address: &str) -> Result<(), CoreError> {
    require_field("Email", address)?;
    let valid = address
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(CoreError::validation(format!(
            "'{}' is not a valid email address",
            address.trim()
        )));
    }
    Ok(())
}

/// Update actions operate on exactly one selected row.
pub fn require_single_selection(count: usize) -> Result<(), CoreError> {
    match count {
        1 => Ok(()),
        0 => Err(CoreError::validation("Select one row to update")),
        _ => Err(CoreError::validation("Select only one row to update")),
    }
}

/// Delete actions need at least one selected row.
pub fn require_any_selection(count: usize) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::validation("Select at least one row to delete"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        s.to_string().into()
    }

    #[test]
    fn password_boundary() {
        assert!(validate_password(&secret("1234567")).is_err());
        assert!(validate_password(&secret("12345678")).is_ok());
        assert!(validate_password(&secret("")).is_err());
    }

    #[test]
    fn password_counts_characters_not_bytes() {
        // 7 characters, 14 bytes
        assert!(validate_password(&secret("ééééééé")).is_err());
    }

    #[test]
    fn blank_fields_rejected() {
        assert!(require_field("Location", "   ").is_err());
        assert!(require_field("Location", "Gate-A").is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("ops@example.com").is_ok());
        assert!(validate_email("ops@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("nobody").is_err());
    }

    #[test]
    fn selection_counts() {
        assert!(require_single_selection(1).is_ok());
        assert!(require_single_selection(0).is_err());
        assert!(require_single_selection(2).is_err());
        assert!(require_any_selection(0).is_err());
        assert!(require_any_selection(3).is_ok());
    }
}
