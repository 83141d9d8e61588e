//! Input checks shared by the form-style endpoints.

use serde::Deserialize;

use crate::errors::AppError;

/// `?confirm=true` on destructive requests.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmQuery {
    pub fn require(&self, what: &str) -> Result<(), AppError> {
        if self.confirm {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "deleting {what} requires confirm=true"
            )))
        }
    }
}

/// Trims and returns a required text field.
pub fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Loose `local@domain.tld` shape check. Deliverability is the auth provider's problem.
pub fn validate_email(value: &str) -> Result<String, AppError> {
    let email = require_text("email", value)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(format!("'{email}' is not a valid email address")));
    }
    Ok(email)
}

/// Blank optional fields are stored as absent.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
