//! Field validation helpers shared by every domain entity.
//!
//! Each helper takes the raw value, a field label used in the error message and
//! the bounds to enforce. Helpers never mutate anything; an entity calls all of
//! the helpers it needs before assigning a single field.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use crate::clock::Clock;
use crate::error::ValidationError;

/// Maximum length of every entity identifier.
pub const MAX_ID_LENGTH: usize = 10;
/// Maximum length of a contact's first or last name.
pub const MAX_NAME_LENGTH: usize = 10;
pub const MAX_ADDRESS_LENGTH: usize = 30;
pub const MAX_TASK_NAME_LENGTH: usize = 20;
/// Maximum length of task and appointment descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 50;
pub const MAX_PROJECT_NAME_LENGTH: usize = 50;
pub const MAX_PROJECT_DESCRIPTION_LENGTH: usize = 100;
/// Exact number of digits in a phone number.
pub const PHONE_LENGTH: usize = 10;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 100;
/// Maximum length of the role a contact plays on a project.
pub const MAX_ROLE_LENGTH: usize = 50;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Fails when `input` is empty or whitespace-only.
pub fn validate_not_blank(input: &str, label: &'static str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Blank { label });
    }
    Ok(())
}

/// Fails when `input` is blank or its trimmed length is outside `[min, max]`.
pub fn validate_length(
    input: &str,
    label: &'static str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    validate_not_blank(input, label)?;
    check_bounds(input.trim(), label, min, max)
}

/// Same checks as [`validate_length`], returning the trimmed value to store.
pub fn validate_trimmed_length(
    input: &str,
    label: &'static str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    validate_length(input, label, min, max)?;
    Ok(input.trim().to_string())
}

/// Like [`validate_trimmed_length`], but a blank value is accepted as `""`
/// when `min` is zero.
pub fn validate_trimmed_length_allow_blank(
    input: &str,
    label: &'static str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        if min == 0 {
            return Ok(String::new());
        }
        return Err(ValidationError::Blank { label });
    }
    check_bounds(trimmed, label, min, max)?;
    Ok(trimmed.to_string())
}

/// Fails unless `input` is exactly `length` ASCII digits.
///
/// The value is not trimmed: surrounding whitespace is itself a failure.
pub fn validate_digits(
    input: &str,
    label: &'static str,
    length: usize,
) -> Result<(), ValidationError> {
    validate_not_blank(input, label)?;
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NotDigits { label });
    }
    if input.len() != length {
        return Err(ValidationError::DigitCount { label, length });
    }
    Ok(())
}

/// Validates an email address and returns it trimmed.
pub fn validate_email(input: &str, label: &'static str) -> Result<String, ValidationError> {
    let trimmed = validate_trimmed_length(input, label, 1, MAX_EMAIL_LENGTH)?;
    if !EMAIL_PATTERN.is_match(&trimmed) {
        return Err(ValidationError::Email { label });
    }
    Ok(trimmed)
}

/// Fails when `date` is absent or strictly earlier than `clock.now()`.
///
/// An instant equal to "now" is accepted.
pub fn validate_date_not_past(
    date: Option<DateTime<Utc>>,
    label: &'static str,
    clock: &dyn Clock,
) -> Result<DateTime<Utc>, ValidationError> {
    let date = validate_not_null(date, label)?;
    if date < clock.now() {
        return Err(ValidationError::InPast { label });
    }
    Ok(date)
}

/// Calendar-day variant of [`validate_date_not_past`]; today is accepted.
pub fn validate_day_not_past(
    date: Option<NaiveDate>,
    label: &'static str,
    clock: &dyn Clock,
) -> Result<NaiveDate, ValidationError> {
    let date = validate_not_null(date, label)?;
    if date < clock.today() {
        return Err(ValidationError::InPast { label });
    }
    Ok(date)
}

/// Skips the check entirely when no date is given.
pub fn validate_optional_day_not_past(
    date: Option<NaiveDate>,
    label: &'static str,
    clock: &dyn Clock,
) -> Result<Option<NaiveDate>, ValidationError> {
    match date {
        None => Ok(None),
        Some(date) => validate_day_not_past(Some(date), label, clock).map(Some),
    }
}

/// Normalizes an optional reference to another entity's id.
///
/// `None` and blank values both mean "not linked".
pub fn validate_optional_id(
    input: Option<&str>,
    label: &'static str,
) -> Result<Option<String>, ValidationError> {
    match input {
        Some(value) if !value.trim().is_empty() => {
            validate_trimmed_length(value, label, 1, MAX_ID_LENGTH).map(Some)
        }
        _ => Ok(None),
    }
}

/// Fails when a required value was not supplied.
pub fn validate_not_null<T>(value: Option<T>, label: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { label })
}

fn check_bounds(
    trimmed: &str,
    label: &'static str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let length = trimmed.chars().count();
    if length < min || length > max {
        return Err(ValidationError::Length { label, min, max });
    }
    Ok(())
}
