//! Credential Hasher
//!
//! Configurable hasher behind the [`crate::password`] contract.
//!
//! Each hash or verification is CPU-bound by design (the cost factor makes it
//! slow). Async callers use [`CredentialHasher::hash_async`] and
//! [`CredentialHasher::verify_async`], which run the work on the Tokio
//! blocking pool so one expensive hash does not stall unrelated requests.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::PasswordHashError;
use crate::hash_format::{Argon2Params, Cost, HashAlgorithm, HashParams, MIN_COST};
use crate::password::{ClearTextPassword, HashedPassword};

// ============================================================================
// Configuration
// ============================================================================

/// Hasher configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherConfig {
    /// Algorithm used for new hashes
    pub algorithm: HashAlgorithm,
    /// bcrypt cost factor
    pub cost: Cost,
    /// Argon2id parameters
    pub argon2: Argon2Params,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Bcrypt,
            cost: Cost::default(),
            argon2: Argon2Params::default(),
        }
    }
}

impl HasherConfig {
    /// Cheapest accepted settings (for development and tests)
    pub fn development() -> Self {
        Self {
            algorithm: HashAlgorithm::Bcrypt,
            cost: Cost::new(MIN_COST).unwrap_or_default(),
            argon2: Argon2Params {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        }
    }

    pub fn with_algorithm(self, algorithm: HashAlgorithm) -> Self {
        Self { algorithm, ..self }
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Stateless credential hasher
///
/// Cloning is cheap; the pepper is shared behind an `Arc` and zeroized when
/// the last clone is dropped.
#[derive(Clone, Default)]
pub struct CredentialHasher {
    config: HasherConfig,
    pepper: Option<Arc<Zeroizing<Vec<u8>>>>,
}

impl CredentialHasher {
    pub fn new(config: HasherConfig) -> Self {
        Self {
            config,
            pepper: None,
        }
    }

    /// Set an application-wide pepper
    ///
    /// The pepper must be the same for hashing and verification. An empty
    /// pepper disables peppering.
    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        let pepper = Zeroizing::new(pepper.into());
        self.pepper = if pepper.is_empty() {
            None
        } else {
            Some(Arc::new(pepper))
        };
        self
    }

    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    /// Hash a password with the configured algorithm and a fresh salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let input = self.secret_input(password)?;
        let start = Instant::now();

        let encoded = match self.config.algorithm {
            HashAlgorithm::Bcrypt => bcrypt::hash(input.as_slice(), self.config.cost.get())
                .map_err(|e| PasswordHashError::Hashing(e.to_string()))?,
            HashAlgorithm::Argon2id => {
                // 128-bit salt from the OS RNG
                let salt = SaltString::generate(&mut OsRng);
                let argon2 = Argon2::new(
                    Algorithm::Argon2id,
                    Version::V0x13,
                    self.config.argon2.to_argon2()?,
                );
                argon2
                    .hash_password(input.as_slice(), &salt)
                    .map_err(|e| PasswordHashError::Hashing(e.to_string()))?
                    .to_string()
            }
        };

        tracing::debug!(
            algorithm = %self.config.algorithm,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Password hashed"
        );

        HashedPassword::from_encoded(encoded)
    }

    /// Verify a password against a stored hash
    ///
    /// Uses the algorithm and parameters embedded in `hashed`, not the
    /// configured ones, so hashes made under older settings keep verifying.
    /// Digest comparison is constant-time in both backends.
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        hashed: &HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        let input = self.secret_input(password)?;

        match hashed.params() {
            HashParams::Bcrypt { .. } => bcrypt::verify(input.as_slice(), hashed.as_str())
                .map_err(|_| PasswordHashError::MalformedHash),
            HashParams::Argon2id(_) => {
                let parsed = PasswordHash::new(hashed.as_str())
                    .map_err(|_| PasswordHashError::MalformedHash)?;
                match Argon2::default().verify_password(input.as_slice(), &parsed) {
                    Ok(()) => Ok(true),
                    Err(password_hash::Error::Password) => Ok(false),
                    Err(_) => Err(PasswordHashError::MalformedHash),
                }
            }
        }
    }

    /// Check if the hash should be replaced with one made under the
    /// current configuration
    ///
    /// True for another algorithm, a lower bcrypt cost, or different
    /// Argon2 parameters.
    pub fn needs_rehash(&self, hashed: &HashedPassword) -> bool {
        match (self.config.algorithm, hashed.params()) {
            (HashAlgorithm::Bcrypt, HashParams::Bcrypt { cost }) => *cost < self.config.cost.get(),
            (HashAlgorithm::Argon2id, HashParams::Argon2id(params)) => {
                *params != self.config.argon2
            }
            _ => true,
        }
    }

    /// [`Self::hash`] on the blocking thread pool
    pub async fn hash_async(
        &self,
        password: ClearTextPassword,
    ) -> Result<HashedPassword, PasswordHashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordHashError::Hashing(format!("hashing task failed: {e}")))?
    }

    /// [`Self::verify`] on the blocking thread pool
    pub async fn verify_async(
        &self,
        password: ClearTextPassword,
        hashed: HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| PasswordHashError::Hashing(format!("verification task failed: {e}")))?
    }

    /// Bytes fed to the algorithm
    ///
    /// With a pepper the input is `base64(HMAC-SHA256(pepper, password))`,
    /// 44 bytes, so bcrypt's 72-byte input limit never cuts the pepper off.
    fn secret_input(
        &self,
        password: &ClearTextPassword,
    ) -> Result<Zeroizing<Vec<u8>>, PasswordHashError> {
        let Some(pepper) = &self.pepper else {
            return Ok(Zeroizing::new(password.as_bytes().to_vec()));
        };

        let mut mac = Hmac::<Sha256>::new_from_slice(pepper.as_slice())
            .map_err(|e| PasswordHashError::Hashing(e.to_string()))?;
        mac.update(password.as_bytes());
        let tag = Zeroizing::new(mac.finalize().into_bytes().to_vec());

        Ok(Zeroizing::new(
            general_purpose::STANDARD.encode(tag.as_slice()).into_bytes(),
        ))
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("config", &self.config)
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn password(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s).unwrap()
    }

    fn dev_hasher() -> CredentialHasher {
        CredentialHasher::new(HasherConfig::development())
    }

    #[test]
    fn test_default_config() {
        let config = HasherConfig::default();
        assert_eq!(config.algorithm, HashAlgorithm::Bcrypt);
        assert_eq!(config.cost.get(), 10);
        assert_eq!(config.argon2, Argon2Params::default());
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let hasher = dev_hasher();
        let hashed = hasher.hash(&password("TestPassword123!")).unwrap();

        assert_eq!(hashed.algorithm(), HashAlgorithm::Bcrypt);
        assert_eq!(hashed.cost(), Some(MIN_COST));
        assert!(hasher.verify(&password("TestPassword123!"), &hashed).unwrap());
        assert!(!hasher.verify(&password("WrongPassword123!"), &hashed).unwrap());
    }

    #[test]
    fn test_argon2id_hash_and_verify() {
        let hasher = CredentialHasher::new(
            HasherConfig::development().with_algorithm(HashAlgorithm::Argon2id),
        );
        let hashed = hasher.hash(&password("TestPassword123!")).unwrap();

        assert!(hashed.as_str().starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        assert_eq!(hashed.cost(), None);
        assert!(hasher.verify(&password("TestPassword123!"), &hashed).unwrap());
        assert!(!hasher.verify(&password("WrongPassword123!"), &hashed).unwrap());
    }

    #[test]
    fn test_verify_uses_embedded_algorithm() {
        // A bcrypt hasher still verifies hashes made with Argon2id
        let argon = CredentialHasher::new(
            HasherConfig::development().with_algorithm(HashAlgorithm::Argon2id),
        );
        let hashed = argon.hash(&password("migrating")).unwrap();

        assert!(dev_hasher().verify(&password("migrating"), &hashed).unwrap());
    }

    #[test]
    fn test_hash_with_pepper() {
        let hasher = dev_hasher().with_pepper(b"my_secret_pepper".to_vec());
        let hashed = hasher.hash(&password("TestPassword123!")).unwrap();

        // Correct password with correct pepper
        assert!(hasher.verify(&password("TestPassword123!"), &hashed).unwrap());

        // Correct password without pepper should fail
        assert!(!dev_hasher().verify(&password("TestPassword123!"), &hashed).unwrap());

        // Correct password with wrong pepper should fail
        let wrong = dev_hasher().with_pepper(b"wrong_pepper".to_vec());
        assert!(!wrong.verify(&password("TestPassword123!"), &hashed).unwrap());
    }

    #[test]
    fn test_pepper_survives_long_passwords() {
        // Without peppering through HMAC, bcrypt would only see the first 72 bytes
        let hasher = dev_hasher().with_pepper(b"pepper".to_vec());
        let base = "x".repeat(80);
        let hashed = hasher.hash(&password(&base)).unwrap();

        assert!(hasher.verify(&password(&base), &hashed).unwrap());
        assert!(!hasher.verify(&password(&format!("{base}y")), &hashed).unwrap());
    }

    #[test]
    fn test_empty_pepper_is_no_pepper() {
        let peppered = dev_hasher().with_pepper(Vec::new());
        let hashed = peppered.hash(&password("plain")).unwrap();
        assert!(dev_hasher().verify(&password("plain"), &hashed).unwrap());
    }

    #[test]
    fn test_needs_rehash() {
        let weak = dev_hasher().hash(&password("upgrade-me")).unwrap();

        let strong = CredentialHasher::new(HasherConfig {
            cost: Cost::new(MIN_COST + 1).unwrap(),
            ..HasherConfig::development()
        });
        assert!(strong.needs_rehash(&weak));
        assert!(!dev_hasher().needs_rehash(&weak));

        let argon = CredentialHasher::new(
            HasherConfig::development().with_algorithm(HashAlgorithm::Argon2id),
        );
        assert!(argon.needs_rehash(&weak));

        let argon_hash = argon.hash(&password("upgrade-me")).unwrap();
        assert!(!argon.needs_rehash(&argon_hash));
        assert!(dev_hasher().needs_rehash(&argon_hash));

        let heavier_argon = CredentialHasher::new(HasherConfig {
            algorithm: HashAlgorithm::Argon2id,
            argon2: Argon2Params {
                iterations: 2,
                ..HasherConfig::development().argon2
            },
            ..HasherConfig::development()
        });
        assert!(heavier_argon.needs_rehash(&argon_hash));
    }

    #[test]
    fn test_invalid_argon2_params() {
        let hasher = CredentialHasher::new(HasherConfig {
            algorithm: HashAlgorithm::Argon2id,
            argon2: Argon2Params {
                memory_kib: 1,
                iterations: 0,
                parallelism: 1,
            },
            ..HasherConfig::development()
        });

        assert!(matches!(
            hasher.hash(&password("secret")),
            Err(PasswordHashError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_debug_redacts_pepper() {
        let hasher = dev_hasher().with_pepper(b"super-secret-pepper".to_vec());
        let debug = format!("{:?}", hasher);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("super-secret-pepper"));
    }

    #[tokio::test]
    async fn test_async_matches_sync() {
        let hasher = dev_hasher();
        let hashed = hasher.hash_async(password("async-secret")).await.unwrap();

        assert!(hasher.verify(&password("async-secret"), &hashed).unwrap());
        assert!(
            hasher
                .verify_async(password("async-secret"), hashed.clone())
                .await
                .unwrap()
        );
        assert!(
            !hasher
                .verify_async(password("other-secret"), hashed)
                .await
                .unwrap()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_hashes_are_independent() {
        let hasher = dev_hasher();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let hasher = hasher.clone();
                tokio::spawn(async move {
                    let secret = format!("secret-{i}");
                    let hashed = hasher.hash_async(password(&secret)).await.unwrap();
                    (secret, hashed)
                })
            })
            .collect();

        for handle in handles {
            let (secret, hashed) = handle.await.unwrap();
            assert!(hasher.verify(&password(&secret), &hashed).unwrap());
        }
    }

    #[test]
    fn test_verify_async_from_sync_context() {
        let hasher = dev_hasher();
        let hashed = hasher.hash(&password("blocking")).unwrap();

        let matched = tokio_test::block_on(hasher.verify_async(password("blocking"), hashed));
        assert_eq!(matched, Ok(true));
    }
}
