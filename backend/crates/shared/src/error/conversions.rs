//! Error conversions - From implementations for common error types
//!
//! A missing variable is `NotFound`; a value that is not UTF-8 is a client
//! error.

use super::app_error::AppError;

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        match err {
            std::env::VarError::NotPresent => {
                AppError::not_found("Environment variable not set").with_source(err)
            }
            std::env::VarError::NotUnicode(_) => {
                AppError::bad_request("Environment variable is not valid UTF-8").with_source(err)
            }
        }
    }
}
