//! Field-level validation errors.
//!
//! Validators collect every problem in a request before anything is written,
//! so a client can fix all fields in one round trip.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::AppError;

/// Map of field name (as spelled in the JSON request) to human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the error of a `Result<_, String>` validator, if any.
    pub fn check(&mut self, field: &str, outcome: Result<(), String>) {
        if let Err(message) = outcome {
            self.add(field, message);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Turn the collected errors into `AppError::Validation`, or `Ok` when none were found.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if at least one field error was recorded.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

/// Validate that a string has at least `min` characters (Unicode scalar values).
///
/// # Errors
///
/// Returns a descriptive error message if the value is too short.
pub fn min_chars(value: &str, min: usize, label: &str) -> Result<(), String> {
    if value.chars().count() < min {
        return Err(format!("{label} must be at least {min} characters."));
    }
    Ok(())
}

/// Validate that a string has at most `max` characters.
///
/// # Errors
///
/// Returns a descriptive error message if the value is too long.
pub fn max_chars(value: &str, max: usize, label: &str) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{label} must be at most {max} characters."));
    }
    Ok(())
}

/// Validate email format (basic check for `@` and non-empty parts).
///
/// # Errors
///
/// Returns a descriptive error message if the email is invalid.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err("Email is required.".to_string());
    }
    let parts: Vec<&str> = trimmed.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err("Invalid email format.".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_messages_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("title", "too short");
        errors.add("title", "too dull");
        errors.check("capacity", Err("out of range".to_string()));
        errors.check("games", Ok(()));

        assert_eq!(errors.messages("title").len(), 2);
        assert_eq!(errors.messages("capacity"), ["out of range".to_string()]);
        assert!(errors.messages("games").is_empty());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn empty_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn char_bounds_count_unicode_scalars() {
        assert!(min_chars("Café", 4, "Title").is_ok());
        assert!(min_chars("Azu", 4, "Title").is_err());
        assert!(max_chars("ééé", 3, "Body").is_ok());
        assert!(max_chars("éééé", 3, "Body").is_err());
    }

    #[test]
    fn email_format() {
        assert!(validate_email("host@example.com").is_ok());
        assert!(validate_email("  ").is_err());
        assert!(validate_email("host@example").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }
}
