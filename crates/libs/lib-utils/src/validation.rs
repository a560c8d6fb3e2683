//! # Validation Utilities
//!
//! Input validation helpers for registration and login payloads.
//!
//! Every check returns `Err(String)` with a human-readable message that can be surfaced
//! to the client as-is.

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum password length in characters.
pub const PASSWORD_MAX_LEN: usize = 50;

const EMAIL_MIN_LEN: usize = 3;
const EMAIL_MAX_LEN: usize = 254;

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a string has at least one character.
///
/// Unlike [`validate_not_empty`] whitespace counts, so it suits secrets like passwords.
pub fn validate_present(value: &str, field_name: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a name contains letters only (any script, no digits, spaces or punctuation).
pub fn validate_letters_only(value: &str, field_name: &str) -> Result<(), String> {
    if value.chars().all(char::is_alphabetic) {
        Ok(())
    } else {
        Err(format!("{} must contain letters only", field_name))
    }
}

/// Validate email structure and length.
pub fn validate_email_syntax(email: &str) -> Result<(), String> {
    if email.len() < EMAIL_MIN_LEN || email.len() > EMAIL_MAX_LEN {
        return Err("Invalid email format".to_string());
    }

    if validator::validate_email(email) {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Check that the domain part of an email resolves to at least one address.
///
/// Assumes the email already passed [`validate_email_syntax`].
pub async fn domain_resolves(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };

    match tokio::net::lookup_host((domain, 0)).await {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(_) => false,
    }
}

/// Validate the password policy.
///
/// The password must be 8 to 50 characters long and contain single-byte characters only,
/// so that its byte length and character count agree.
pub fn validate_password_policy(password: &str) -> Result<(), String> {
    if password.len() != password.chars().count() {
        return Err("Password contains unsupported characters".to_string());
    }

    if password.len() < PASSWORD_MIN_LEN || password.len() > PASSWORD_MAX_LEN {
        return Err(format!(
            "Password must be between {} and {} characters long",
            PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
        ));
    }

    Ok(())
}
