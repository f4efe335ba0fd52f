//! Request payload checks shared by the handlers.
//!
//! Every check runs before the handler touches the store, and all failures for one
//! request are collected so the client sees every bad field at once.

use std::collections::HashMap;

use crate::error::ApiError;

pub const USERNAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 120;
pub const TITLE_MAX: usize = 150;
pub const CATEGORY_NAME_MAX: usize = 50;

/// Per-field error messages gathered while checking a payload
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Trimmed value of a required field, recording an error when it is missing or blank.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.add(field, format!("{} is required", field));
                None
            }
        }
    }

    /// Like [`FieldErrors::required`], but free text is returned exactly as sent.
    /// Surrounding whitespace only counts toward the blank check.
    pub fn required_text<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        self.required(field, value).and(value)
    }

    /// Records an error when `value` is longer than `max` characters.
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("{} must be at most {} characters", field, max));
        }
    }

    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok` when nothing was recorded, otherwise a `ValidationError` carrying every field.
    pub fn finish(self, message: &str) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.into_error(message))
        }
    }

    pub fn into_error(self, message: &str) -> ApiError {
        ApiError::validation_error(message, Some(self.errors))
    }
}

/// Validate username format
///
/// 3 to 50 characters of letters, digits, underscore or hyphen, starting with a
/// letter or digit.
pub fn validate_username_format(username: &str) -> Result<(), String> {
    let length = username.chars().count();

    if length < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }

    if length > USERNAME_MAX {
        return Err(format!("Username must be at most {} characters", USERNAME_MAX));
    }

    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err("Username can only contain letters, numbers, underscore, and hyphen".to_string());
    }

    // Must start with alphanumeric
    if !username.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err("Username must start with a letter or number".to_string());
    }

    Ok(())
}

/// Validate email format
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.chars().count() > EMAIL_MAX {
        return Err(format!("Email must be at most {} characters", EMAIL_MAX));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    let domain = parts[1];
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}
