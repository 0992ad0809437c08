//! Common validation utilities.

use validator::{ValidateEmail, ValidationError};

/// Maximum length of a client's first or last name.
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum length of a client's e-mail address.
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Maximum length of a phone number.
pub const MAX_PHONE_LENGTH: usize = 20;

lazy_static::lazy_static! {
    /// Optional leading `+`, then digits with spaces, dashes or parentheses.
    pub static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[0-9][0-9 ()\-]*$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a first or last name: required, at most 50 characters.
/// A name made only of whitespace counts as empty.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if name.trim().is_empty() {
        Err(error("name_required", "Name must not be empty"))
    } else if len > MAX_NAME_LENGTH {
        Err(error("name_length", "Name must be at most 50 characters"))
    } else {
        Ok(())
    }
}

/// Validates an e-mail address: syntactically valid, at most 100 characters.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(error("email_length", "Email must be at most 100 characters"));
    }
    if !email.validate_email() {
        return Err(error("email_format", "Email address is not valid"));
    }
    Ok(())
}

/// Validates a phone number.
/// - Must be 1-20 characters
/// - Digits with an optional leading `+`; spaces, dashes and parentheses allowed
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let len = phone.chars().count();
    if len == 0 {
        return Err(error("phone_required", "Phone number must not be empty"));
    }
    if len > MAX_PHONE_LENGTH {
        return Err(error(
            "phone_length",
            "Phone number must be at most 20 characters",
        ));
    }
    if !PHONE_REGEX.is_match(phone) {
        return Err(error(
            "phone_format",
            "Phone number may only contain digits, spaces, dashes, parentheses and a leading +",
        ));
    }
    Ok(())
}

/// Validates every phone number in a list, stopping at the first invalid one.
pub fn validate_phone_numbers(phones: &[String]) -> Result<(), ValidationError> {
    phones.iter().try_for_each(|p| validate_phone_number(p))
}
