//! Hash Encodings
//!
//! Recognizes the two encodings this crate produces and verifies:
//!
//! - bcrypt: `$2b$10$` followed by a 22-char salt and a 31-char digest
//!   (bcrypt base64 alphabet `./A-Za-z0-9`, 60 chars total)
//! - Argon2id PHC string: `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`
//!
//! Parsing happens before any digest work, so a corrupt stored value is
//! reported as [`PasswordHashError::MalformedHash`] instead of a mismatch.

use std::fmt;
use std::str::FromStr;

use argon2::PasswordHash;
use serde::{Deserialize, Serialize};

use crate::error::PasswordHashError;

// ============================================================================
// Constants
// ============================================================================

/// Default bcrypt cost factor (2^10 key expansion rounds)
pub const DEFAULT_COST: u32 = 10;

/// Lowest cost bcrypt accepts
pub const MIN_COST: u32 = 4;

/// Highest cost bcrypt accepts
pub const MAX_COST: u32 = 31;

/// bcrypt version prefixes accepted for verification
const BCRYPT_VERSIONS: &[&str] = &["2a", "2b", "2x", "2y"];

/// Salt (22) + digest (31) characters after the cost field
const BCRYPT_BODY_LEN: usize = 53;

// ============================================================================
// Algorithm
// ============================================================================

/// Hash algorithm used for new hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Bcrypt,
    Argon2id,
}

impl HashAlgorithm {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            HashAlgorithm::Bcrypt => "bcrypt",
            HashAlgorithm::Argon2id => "argon2id",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unknown algorithm name in configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown hash algorithm: {0} (expected bcrypt or argon2id)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(HashAlgorithm::Bcrypt),
            "argon2id" | "argon2" => Ok(HashAlgorithm::Argon2id),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

// ============================================================================
// Cost factor
// ============================================================================

/// Validated bcrypt cost factor
///
/// Each increment doubles the work per hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cost(u32);

impl Cost {
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordHashError::InvalidCost {
                cost,
                min: MIN_COST,
                max: MAX_COST,
            });
        }
        Ok(Self(cost))
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Cost {
    fn default() -> Self {
        Self(DEFAULT_COST)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Argon2 parameters
// ============================================================================

/// Argon2id work parameters
///
/// Defaults are the OWASP recommendation: m=19456 (19 MiB), t=2, p=1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Argon2Params {
    pub(crate) fn to_argon2(self) -> Result<argon2::Params, PasswordHashError> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))
    }
}

// ============================================================================
// Parsed parameters of a stored hash
// ============================================================================

/// Parameters embedded in an encoded hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashParams {
    Bcrypt { cost: u32 },
    Argon2id(Argon2Params),
}

impl HashParams {
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            HashParams::Bcrypt { .. } => HashAlgorithm::Bcrypt,
            HashParams::Argon2id(_) => HashAlgorithm::Argon2id,
        }
    }

    /// Parse and validate an encoded hash without doing any digest work
    pub fn parse(encoded: &str) -> Result<Self, PasswordHashError> {
        if encoded.starts_with("$argon2") {
            parse_argon2(encoded)
        } else if encoded.starts_with("$2") {
            parse_bcrypt(encoded)
        } else {
            Err(PasswordHashError::MalformedHash)
        }
    }
}

fn parse_bcrypt(encoded: &str) -> Result<HashParams, PasswordHashError> {
    let rest = encoded
        .strip_prefix('$')
        .ok_or(PasswordHashError::MalformedHash)?;

    let mut parts = rest.split('$');
    let (Some(version), Some(cost), Some(body), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(PasswordHashError::MalformedHash);
    };

    if !BCRYPT_VERSIONS.contains(&version) {
        return Err(PasswordHashError::MalformedHash);
    }

    if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PasswordHashError::MalformedHash);
    }
    let cost: u32 = cost.parse().map_err(|_| PasswordHashError::MalformedHash)?;
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(PasswordHashError::MalformedHash);
    }

    if body.len() != BCRYPT_BODY_LEN || !body.bytes().all(is_bcrypt_base64) {
        return Err(PasswordHashError::MalformedHash);
    }

    Ok(HashParams::Bcrypt { cost })
}

fn parse_argon2(encoded: &str) -> Result<HashParams, PasswordHashError> {
    let parsed = PasswordHash::new(encoded).map_err(|_| PasswordHashError::MalformedHash)?;

    if parsed.algorithm != argon2::Algorithm::Argon2id.ident() {
        return Err(PasswordHashError::MalformedHash);
    }
    if parsed.salt.is_none() || parsed.hash.is_none() {
        return Err(PasswordHashError::MalformedHash);
    }

    let params =
        argon2::Params::try_from(&parsed).map_err(|_| PasswordHashError::MalformedHash)?;

    Ok(HashParams::Argon2id(Argon2Params {
        memory_kib: params.m_cost(),
        iterations: params.t_cost(),
        parallelism: params.p_cost(),
    }))
}

#[inline]
fn is_bcrypt_base64(b: u8) -> bool {
    b == b'.' || b == b'/' || b.is_ascii_alphanumeric()
}

// ============================================================================
// Tests
// ============================================================================
