//! Password Hashing and Verification
//!
//! The public contract of the crate:
//! - [`generate_hash`] produces a salted bcrypt hash (default cost 10)
//! - [`verify`] checks a plaintext against a stored hash
//!
//! plus the two value types behind it, [`ClearTextPassword`] (zeroized on
//! drop, never printed) and [`HashedPassword`] (validated encoding, safe to
//! store).
//!
//! ## Outcomes of `verify`
//! - `Ok(true)`: the plaintext matches
//! - `Ok(false)`: well-formed hash, different plaintext
//! - `Err(PasswordHashError::MalformedHash)`: the stored value is corrupt

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::PasswordHashError;
use crate::hash_format::{Cost, HashAlgorithm, HashParams};
use crate::hasher::{CredentialHasher, HasherConfig};

// ============================================================================
// Contract
// ============================================================================

/// Hash a plaintext secret with bcrypt
///
/// ## Arguments
/// * `plaintext` - Non-empty secret
/// * `cost` - bcrypt cost factor, `None` for the default (10)
///
/// ## Returns
/// Encoded hash (`$2b$<cost>$<salt><digest>`). Two calls with the same
/// plaintext return different strings because each call draws a fresh salt.
pub fn generate_hash(plaintext: &str, cost: Option<u32>) -> Result<String, PasswordHashError> {
    let cost = cost.map(Cost::new).transpose()?.unwrap_or_default();
    let password = ClearTextPassword::new(plaintext)?;

    let hasher = CredentialHasher::new(HasherConfig {
        algorithm: HashAlgorithm::Bcrypt,
        cost,
        ..HasherConfig::default()
    });

    Ok(hasher.hash(&password)?.into_string())
}

/// Verify a plaintext secret against a stored hash
///
/// Accepts both bcrypt and Argon2id encodings. An empty plaintext can never
/// have been hashed, so it verifies as `false` against any well-formed hash.
pub fn verify(plaintext: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
    let hashed = HashedPassword::from_encoded(stored_hash)?;

    let password = match ClearTextPassword::new(plaintext) {
        Ok(password) => password,
        Err(PasswordHashError::EmptyPassword) => return Ok(false),
        Err(e) => return Err(e),
    };

    CredentialHasher::default().verify(&password, &hashed)
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// Length and strength rules are left to the caller; the only requirement
/// here is that the secret is not empty.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password
    ///
    /// The UTF-8 bytes are hashed exactly as given, so hashes made by any
    /// other bcrypt implementation over the same bytes verify here.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordHashError> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(PasswordHashError::EmptyPassword);
        }

        Ok(Self(raw))
    }

    /// Get the password as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Encoded password hash
///
/// Always holds a value that parsed as a bcrypt or Argon2id encoding, so
/// verification against it can only fail for environmental reasons.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    encoded: String,
    params: HashParams,
}

impl HashedPassword {
    /// Create from an encoded string (e.g., from the database)
    pub fn from_encoded(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let encoded = s.into();
        let params = HashParams::parse(&encoded)?;
        Ok(Self { encoded, params })
    }

    /// Get the encoded string for storage
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn into_string(self) -> String {
        self.encoded
    }

    pub fn params(&self) -> &HashParams {
        &self.params
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.params.algorithm()
    }

    /// bcrypt cost factor, `None` for Argon2id hashes
    pub fn cost(&self) -> Option<u32> {
        match self.params {
            HashParams::Bcrypt { cost } => Some(cost),
            HashParams::Argon2id(_) => None,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("algorithm", &self.algorithm())
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
