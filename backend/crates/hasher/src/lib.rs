//! Hasher Crate - Credential hashing and verification
//!
//! This crate turns a plaintext secret into a salted one-way hash that is
//! safe to persist, and checks a plaintext against such a hash later:
//! - bcrypt (default, cost factor 10) and Argon2id encodings
//! - Fresh OS-random salt per hash, embedded in the encoded string
//! - Constant-time digest comparison
//! - Optional application-wide pepper
//! - Blocking work offloaded to the Tokio blocking pool for async callers
//!
//! The two-function contract lives in [`password`]:
//!
//! ```rust
//! use hasher::password::{generate_hash, verify};
//!
//! let hash = generate_hash("correct-horse", Some(4))?;
//! assert!(verify("correct-horse", &hash)?);
//! assert!(!verify("wrong-horse", &hash)?);
//! # Ok::<(), hasher::PasswordHashError>(())
//! ```

pub mod error;
pub mod hash_format;
pub mod hasher;
pub mod password;

pub use error::PasswordHashError;
pub use hash_format::{Argon2Params, Cost, HashAlgorithm, HashParams};
pub use hasher::{CredentialHasher, HasherConfig};
pub use password::{ClearTextPassword, HashedPassword, generate_hash, verify};
