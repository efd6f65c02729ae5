//! Field-level validation shared by accounts, customers and products.

use crate::errors::ModelError;

/// Trim and lower-case an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain with
/// non-empty labels, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::Validation("a valid email is required".into());
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// Required text field: trimmed, must not be empty.
pub fn required(field: &str, value: &str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Optional text field: trimmed, blank collapses to `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Finite and `>= 0`.
pub fn non_negative(field: &str, value: f64) -> Result<f64, ModelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ModelError::Validation(format!("{field} must be a number >= 0")));
    }
    Ok(value)
}

/// Integer in `0..=i32::MAX`.
pub fn non_negative_int(field: &str, value: i64) -> Result<i32, ModelError> {
    i32::try_from(value)
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| ModelError::Validation(format!("{field} must be an integer >= 0")))
}
