//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::env::{self, VarError};

use base64::{Engine, engine::general_purpose};
use hasher::{Cost, CredentialHasher, HashAlgorithm, HasherConfig};
use kernel::error::app_error::{AppResult, ResultExt};
use kernel::error::kind::ErrorKind;

/// Algorithm for new hashes (`bcrypt` or `argon2id`)
pub const ENV_PASSWORD_ALGORITHM: &str = "PASSWORD_ALGORITHM";
/// bcrypt cost factor (4..=31)
pub const ENV_PASSWORD_COST: &str = "PASSWORD_COST";
/// Base64 (standard alphabet) application-wide pepper
pub const ENV_PASSWORD_PEPPER: &str = "PASSWORD_PEPPER";

/// Auth application configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Settings for new password hashes
    pub hasher: HasherConfig,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    /// Create config for development (cheapest hash settings)
    pub fn development() -> Self {
        Self {
            hasher: HasherConfig::development(),
            ..Default::default()
        }
    }

    /// Load from process environment
    ///
    /// Unset variables keep their defaults; set but invalid ones are errors.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let read = |key: &str| -> AppResult<Option<String>> {
            match lookup(key) {
                Ok(value) if value.trim().is_empty() => Ok(None),
                Ok(value) => Ok(Some(value.trim().to_string())),
                Err(VarError::NotPresent) => Ok(None),
                Err(e) => Err(e.into()),
            }
        };

        let mut config = Self::default();

        if let Some(raw) = read(ENV_PASSWORD_ALGORITHM)? {
            config.hasher.algorithm = raw.parse::<HashAlgorithm>().map_app_err(
                ErrorKind::BadRequest,
                "PASSWORD_ALGORITHM must be bcrypt or argon2id",
            )?;
        }

        if let Some(raw) = read(ENV_PASSWORD_COST)? {
            let cost = raw
                .parse::<u32>()
                .map_app_err(ErrorKind::BadRequest, "PASSWORD_COST must be an integer")?;
            config.hasher.cost = Cost::new(cost)?;
        }

        if let Some(raw) = read(ENV_PASSWORD_PEPPER)? {
            let pepper = general_purpose::STANDARD
                .decode(raw.as_bytes())
                .map_app_err(ErrorKind::BadRequest, "PASSWORD_PEPPER must be base64")?;
            config.password_pepper = Some(pepper);
        }

        Ok(config)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Build the hasher used by the use cases
    pub fn credential_hasher(&self) -> CredentialHasher {
        let hasher = CredentialHasher::new(self.hasher);
        match self.pepper() {
            Some(pepper) => hasher.with_pepper(pepper),
            None => hasher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AuthConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.hasher, HasherConfig::default());
        assert_eq!(config.hasher.cost.get(), 10);
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = AuthConfig::from_lookup(lookup(&[
            (ENV_PASSWORD_ALGORITHM, "argon2id"),
            (ENV_PASSWORD_COST, "12"),
            (ENV_PASSWORD_PEPPER, "c2VjcmV0LXBlcHBlcg=="),
        ]))
        .unwrap();

        assert_eq!(config.hasher.algorithm, HashAlgorithm::Argon2id);
        assert_eq!(config.hasher.cost.get(), 12);
        assert_eq!(config.pepper(), Some(&b"secret-pepper"[..]));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = AuthConfig::from_lookup(lookup(&[(ENV_PASSWORD_COST, "  ")])).unwrap();
        assert_eq!(config.hasher.cost.get(), 10);
    }

    #[test]
    fn test_invalid_values() {
        let err = AuthConfig::from_lookup(lookup(&[(ENV_PASSWORD_ALGORITHM, "md5")])).unwrap_err();
        assert_eq!(err.status_code(), 400);

        let err = AuthConfig::from_lookup(lookup(&[(ENV_PASSWORD_COST, "ten")])).unwrap_err();
        assert_eq!(err.message(), "PASSWORD_COST must be an integer");

        let err = AuthConfig::from_lookup(lookup(&[(ENV_PASSWORD_COST, "40")])).unwrap_err();
        assert!(err.is_client_error());

        let err =
            AuthConfig::from_lookup(lookup(&[(ENV_PASSWORD_PEPPER, "not base64!")])).unwrap_err();
        assert_eq!(err.message(), "PASSWORD_PEPPER must be base64");
    }

    #[test]
    fn test_credential_hasher_uses_config() {
        let config = AuthConfig::development();
        let hasher = config.credential_hasher();
        assert_eq!(hasher.config().cost.get(), 4);
    }
}
