//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! at the handler boundary.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, category, table, customer/contact names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, special requests, feedback comments
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Guests per table booking
pub const MAX_BOOKING_GUESTS: i32 = 50;

/// Guests per private event
pub const MAX_EVENT_GUESTS: i32 = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate an email address: single `@`, non-empty local part and domain.
///
/// 完整的 RFC 校验交给投递通道，这里只拦明显写错的。
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::validation(format!(
            "{field} is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate a guest count within `1..=max`.
pub fn validate_guest_count(count: i32, max: i32) -> Result<(), AppError> {
    if count < 1 {
        return Err(AppError::validation("guest_count must be at least 1"));
    }
    if count > max {
        return Err(AppError::validation(format!(
            "guest_count exceeds maximum allowed ({max})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("ok", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn email_needs_local_and_domain() {
        assert!(validate_email("a@b.com", "email").is_ok());
        assert!(validate_email("a@b", "email").is_err());
        assert!(validate_email("@b.com", "email").is_err());
        assert!(validate_email("nope", "email").is_err());
    }

    #[test]
    fn guest_count_bounds() {
        assert!(validate_guest_count(0, MAX_BOOKING_GUESTS).is_err());
        assert!(validate_guest_count(1, MAX_BOOKING_GUESTS).is_ok());
        assert!(validate_guest_count(51, MAX_BOOKING_GUESTS).is_err());
    }
}
