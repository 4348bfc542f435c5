//! Shared request rules and `validator` error flattening.

use crate::FieldError;
use validator::ValidationErrors;

/// Flattens nested `validator` output into one entry per broken rule,
/// ordered by field name.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

pub mod rules {
    use validator::ValidationError;

    const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=32;

    /// Usernames are 3 to 32 characters of letters, digits, `_`, `-` or `.`.
    pub fn valid_username(username: &str) -> Result<(), ValidationError> {
        let len = username.chars().count();
        let code = if len < *USERNAME_LEN.start() {
            "username_too_short"
        } else if len > *USERNAME_LEN.end() {
            "username_too_long"
        } else if username
            .chars()
            .any(|c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            "username_invalid_characters"
        } else {
            return Ok(());
        };
        Err(ValidationError::new(code))
    }
}
