//! Email Value Object
//!
//! Normalized email address used as a login identifier. Only the shape is
//! checked; deliverability is not this module's concern.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Email address value object (lowercased, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> AppResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Email cannot be empty"));
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(AppError::bad_request("Invalid email format"));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(AppError::bad_request("Invalid email format"));
        }
        if email.chars().any(char::is_whitespace) {
            return Err(AppError::bad_request("Email cannot contain whitespace"));
        }

        Ok(Self(email))
    }

    /// Create from a stored value (assumed already normalized)
    pub fn from_storage(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether an identifier should be looked up as an email
    pub fn looks_like(identifier: &str) -> bool {
        identifier.contains('@')
    }
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
