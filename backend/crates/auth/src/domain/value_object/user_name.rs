//! User Name Value Object
//!
//! Public handle used for login and display. The original casing is kept
//! for display; uniqueness and lookup use the lowercase canonical form.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let original = raw.as_ref().trim();

        if original.is_empty() {
            return Err(AppError::bad_request("User name cannot be empty"));
        }
        if original.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "User name must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }
        // '@' is reserved so that a login identifier is unambiguous
        if original.contains('@') {
            return Err(AppError::bad_request("User name cannot contain '@'"));
        }
        if original.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AppError::bad_request("User name cannot contain whitespace"));
        }

        Ok(Self {
            original: original.to_string(),
            canonical: original.to_lowercase(),
        })
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
