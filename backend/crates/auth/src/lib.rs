//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, repository trait
//! - `application/` - Register and login use cases
//! - `infra/` - Storage implementations
//!
//! ## Security Model
//! - Passwords hashed by the `hasher` crate (bcrypt cost 10 by default,
//!   Argon2id selectable), on the blocking thread pool
//! - Unknown user and wrong password produce the same error
//! - A corrupt stored hash is a server error, never a silent mismatch
//! - Hashes made under weaker settings are upgraded on successful login
//! - Storage is injected into each use case; there is no global pool

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{
    LoginInput, LoginOutput, LoginUseCase, RegisterInput, RegisterOutput, RegisterUseCase,
};
pub use domain::{User, UserRepository};
pub use error::{AuthError, AuthResult};
pub use infra::memory::{InMemoryUserRepository, UserRecord};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}
