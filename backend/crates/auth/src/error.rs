//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use hasher::PasswordHashError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// User name already exists
    #[error("User name already exists")]
    UserNameTaken,

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Unknown identifier or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Input rejected before hashing
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Password rejected before hashing
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Stored password hash is not a valid encoding
    #[error("Stored credential is corrupt")]
    CorruptCredential,

    /// Hash computation failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::UserNameTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::Validation(_) | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::CorruptCredential | AuthError::Hashing(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::InvalidCredentials => err.with_action("Check your user name and password"),
            AuthError::UserNameTaken => err.with_action("Please choose another user name"),
            AuthError::EmailTaken => err.with_action("Sign in with this email instead"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::CorruptCredential => {
                tracing::error!("Stored password hash failed to parse");
            }
            AuthError::Hashing(msg) => {
                tracing::error!(message = %msg, "Password hashing error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            AuthError::Validation(err.message().to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        match err {
            PasswordHashError::MalformedHash => AuthError::CorruptCredential,
            PasswordHashError::Hashing(msg) => AuthError::Hashing(msg),
            PasswordHashError::EmptyPassword => AuthError::PasswordValidation(err.to_string()),
            PasswordHashError::InvalidCost { .. } | PasswordHashError::InvalidParams(_) => {
                AuthError::Internal(err.to_string())
            }
        }
    }
}
