//! User Password Value Object
//!
//! Domain wrappers around the `hasher` crate.
//!
//! ## Usage
//! ```rust
//! use auth::models::user_password::{RawPassword, UserPassword};
//! use hasher::{CredentialHasher, HasherConfig};
//!
//! let hasher = CredentialHasher::new(HasherConfig::development());
//! let raw = RawPassword::new("correct-horse".to_string()).unwrap();
//! let stored = UserPassword::hash(&hasher, &raw).unwrap();
//! assert!(stored.verify(&hasher, &raw).unwrap());
//! ```

use hasher::{ClearTextPassword, CredentialHasher, HashedPassword, PasswordHashError};
use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

use crate::error::AuthResult;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password
    ///
    /// Strength rules are a policy of the calling layer; here the password
    /// only has to be non-empty.
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordHashError::EmptyPassword => AppError::bad_request("Password cannot be empty")
                .with_action("Please enter a password"),
            other => AppError::internal(other.to_string()),
        })?;

        Ok(Self(clear_text))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }

    pub(crate) fn into_inner(self) -> ClearTextPassword {
        self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password as persisted in the `password` field
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password on the current thread
    pub fn hash(hasher: &CredentialHasher, raw: &RawPassword) -> AuthResult<Self> {
        Ok(Self(hasher.hash(raw.inner())?))
    }

    /// Hash a raw password on the blocking thread pool
    pub async fn hash_async(hasher: &CredentialHasher, raw: RawPassword) -> AuthResult<Self> {
        Ok(Self(hasher.hash_async(raw.into_inner()).await?))
    }

    /// Create from a stored encoding
    ///
    /// A value that does not parse is reported as a corrupt credential.
    pub fn from_storage(encoded: impl Into<String>) -> AuthResult<Self> {
        Ok(Self(HashedPassword::from_encoded(encoded)?))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn hashed(&self) -> &HashedPassword {
        &self.0
    }

    /// Verify a raw password on the current thread
    pub fn verify(&self, hasher: &CredentialHasher, raw: &RawPassword) -> AuthResult<bool> {
        Ok(hasher.verify(raw.inner(), &self.0)?)
    }

    /// Verify a raw password on the blocking thread pool
    pub async fn verify_async(
        &self,
        hasher: &CredentialHasher,
        raw: RawPassword,
    ) -> AuthResult<bool> {
        Ok(hasher.verify_async(raw.into_inner(), self.0.clone()).await?)
    }

    /// Check if the hash was made under weaker settings than `hasher` uses
    pub fn needs_rehash(&self, hasher: &CredentialHasher) -> bool {
        hasher.needs_rehash(&self.0)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_PASSWORD]")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use hasher::HasherConfig;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(HasherConfig::development())
    }

    #[test]
    fn test_raw_password_rejects_empty() {
        let err = RawPassword::new(String::new()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.action().is_some());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::hash(&hasher, &raw).unwrap();

        assert!(hashed.verify(&hasher, &raw).unwrap());

        let wrong = RawPassword::new("WrongPassword123!".to_string()).unwrap();
        assert!(!hashed.verify(&hasher, &wrong).unwrap());
    }

    #[test]
    fn test_storage_roundtrip() {
        let hasher = hasher();
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::hash(&hasher, &raw).unwrap();

        let restored = UserPassword::from_storage(hashed.as_str()).unwrap();
        assert_eq!(restored, hashed);
        assert!(restored.verify(&hasher, &raw).unwrap());
    }

    #[test]
    fn test_corrupt_storage_value() {
        assert!(matches!(
            UserPassword::from_storage("plaintext-password"),
            Err(AuthError::CorruptCredential)
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        let debug = format!("{:?}", raw);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("Secret"));

        let hashed = UserPassword::hash(&hasher(), &raw).unwrap();
        assert!(format!("{:?}", hashed).contains("[HASH]"));
        assert_eq!(hashed.to_string(), "[HASHED_PASSWORD]");
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hasher = hasher();
        let raw = RawPassword::new("async-password".to_string()).unwrap();
        let hashed = UserPassword::hash_async(&hasher, raw).await.unwrap();

        let raw = RawPassword::new("async-password".to_string()).unwrap();
        assert!(hashed.verify_async(&hasher, raw).await.unwrap());
    }
}
