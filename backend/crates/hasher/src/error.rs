//! Hasher Error Types

use kernel::error::app_error::AppError;
use thiserror::Error;

/// Password hashing/verification errors
///
/// A password that simply does not match is not an error: verification
/// returns `Ok(false)` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// The digest computation could not complete (RNG failure, worker failure)
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// The stored value is not a validly encoded hash
    #[error("Invalid password hash format")]
    MalformedHash,

    /// bcrypt cost factor outside the supported range
    #[error("Cost factor must be between {min} and {max} (got {cost})")]
    InvalidCost { cost: u32, min: u32, max: u32 },

    /// Argon2 parameters rejected by the algorithm
    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),

    /// Empty plaintext secret
    #[error("Password cannot be empty")]
    EmptyPassword,
}

impl From<PasswordHashError> for AppError {
    fn from(err: PasswordHashError) -> Self {
        match err {
            PasswordHashError::Hashing(_) | PasswordHashError::InvalidParams(_) => {
                AppError::internal(err.to_string())
            }
            PasswordHashError::MalformedHash => AppError::internal(err.to_string())
                .with_action("Reset the stored credential"),
            PasswordHashError::InvalidCost { .. } => AppError::bad_request(err.to_string()),
            PasswordHashError::EmptyPassword => {
                AppError::bad_request(err.to_string()).with_action("Please enter a password")
            }
        }
    }
}
