//! CLI Command Runner
//!
//! Executes parsed commands against the hasher configured from the
//! environment. Results are returned as an [`Outcome`] so `main` alone
//! decides what goes to stdout, stderr and the exit status.

use std::io::BufRead;

use anyhow::Context;
use auth::AuthConfig;
use hasher::{
    Argon2Params, ClearTextPassword, Cost, CredentialHasher, HashAlgorithm, HashParams,
    HashedPassword, PasswordHashError,
};
use serde::Serialize;

use super::commands::Commands;

/// Exit status for a successful command or a matching secret
pub const EXIT_OK: u8 = 0;
/// Exit status for a secret that does not match
pub const EXIT_MISMATCH: u8 = 1;
/// Exit status for a stored hash that does not parse
pub const EXIT_MALFORMED: u8 = 2;

/// Result of a command
#[derive(Debug, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub exit_code: u8,
}

impl Outcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: EXIT_OK,
        }
    }

    fn malformed(err: PasswordHashError) -> Self {
        Self {
            message: err.to_string(),
            exit_code: EXIT_MALFORMED,
        }
    }

    /// Whether the message belongs on stderr
    pub fn is_failure(&self) -> bool {
        self.exit_code == EXIT_MALFORMED
    }
}

/// Parameters of a stored hash
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub algorithm: HashAlgorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argon2: Option<Argon2Params>,
    pub needs_rehash: bool,
}

impl Inspection {
    fn render_text(&self) -> String {
        let mut lines = vec![format!("algorithm: {}", self.algorithm)];
        if let Some(cost) = self.cost {
            lines.push(format!("cost: {cost}"));
        }
        if let Some(params) = &self.argon2 {
            lines.push(format!("memory_kib: {}", params.memory_kib));
            lines.push(format!("iterations: {}", params.iterations));
            lines.push(format!("parallelism: {}", params.parallelism));
        }
        lines.push(format!("needs_rehash: {}", self.needs_rehash));
        lines.join("\n")
    }
}

pub struct CommandRunner {
    config: AuthConfig,
}

impl CommandRunner {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub async fn run<R: BufRead>(&self, command: Commands, input: R) -> anyhow::Result<Outcome> {
        match command {
            Commands::Hash { cost, algorithm } => {
                let secret = read_secret(input)?;
                self.hash(secret, cost, algorithm).await
            }
            Commands::Verify { hash } => {
                let secret = read_secret(input)?;
                self.verify(secret, &hash).await
            }
            Commands::Inspect { hash, json } => self.inspect(&hash, json),
        }
    }

    async fn hash(
        &self,
        secret: String,
        cost: Option<u32>,
        algorithm: Option<HashAlgorithm>,
    ) -> anyhow::Result<Outcome> {
        let mut config = self.config.clone();
        if let Some(cost) = cost {
            config.hasher.cost = Cost::new(cost)?;
        }
        if let Some(algorithm) = algorithm {
            config.hasher.algorithm = algorithm;
        }

        let password = ClearTextPassword::new(secret)?;
        let hashed = config.credential_hasher().hash_async(password).await?;

        tracing::debug!(algorithm = %hashed.algorithm(), "Hash generated");

        Ok(Outcome::ok(hashed.into_string()))
    }

    async fn verify(&self, secret: String, hash: &str) -> anyhow::Result<Outcome> {
        let hashed = match HashedPassword::from_encoded(hash) {
            Ok(hashed) => hashed,
            Err(e) => return Ok(Outcome::malformed(e)),
        };

        let matched = match ClearTextPassword::new(secret) {
            Ok(password) => {
                match self
                    .config
                    .credential_hasher()
                    .verify_async(password, hashed)
                    .await
                {
                    Ok(matched) => matched,
                    Err(e @ PasswordHashError::MalformedHash) => return Ok(Outcome::malformed(e)),
                    Err(e) => return Err(e.into()),
                }
            }
            Err(PasswordHashError::EmptyPassword) => false,
            Err(e) => return Err(e.into()),
        };

        Ok(if matched {
            Outcome::ok("match")
        } else {
            Outcome {
                message: "mismatch".to_string(),
                exit_code: EXIT_MISMATCH,
            }
        })
    }

    fn inspect(&self, hash: &str, json: bool) -> anyhow::Result<Outcome> {
        let hashed = match HashedPassword::from_encoded(hash) {
            Ok(hashed) => hashed,
            Err(e) => return Ok(Outcome::malformed(e)),
        };

        let inspection = inspect(&self.config.credential_hasher(), &hashed);

        let message = if json {
            serde_json::to_string_pretty(&inspection).context("failed to encode inspection")?
        } else {
            inspection.render_text()
        };

        Ok(Outcome::ok(message))
    }
}

fn inspect(hasher: &CredentialHasher, hashed: &HashedPassword) -> Inspection {
    let argon2 = match hashed.params() {
        HashParams::Argon2id(params) => Some(*params),
        HashParams::Bcrypt { .. } => None,
    };

    Inspection {
        algorithm: hashed.algorithm(),
        cost: hashed.cost(),
        argon2,
        needs_rehash: hasher.needs_rehash(hashed),
    }
}

/// Read the secret from the first input line, without its line ending
fn read_secret<R: BufRead>(mut input: R) -> anyhow::Result<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read secret from stdin")?;

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }

    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hasher::HasherConfig;
    use std::io::Cursor;

    fn runner() -> CommandRunner {
        CommandRunner::new(AuthConfig::development())
    }

    fn stdin(secret: &str) -> Cursor<Vec<u8>> {
        Cursor::new(format!("{secret}\n").into_bytes())
    }

    async fn hash(runner: &CommandRunner, secret: &str) -> String {
        let outcome = runner
            .run(
                Commands::Hash {
                    cost: None,
                    algorithm: None,
                },
                stdin(secret),
            )
            .await
            .unwrap();
        assert_eq!(outcome.exit_code, EXIT_OK);
        outcome.message
    }

    #[test]
    fn test_read_secret_strips_line_ending() {
        assert_eq!(read_secret(Cursor::new("pw\n")).unwrap(), "pw");
        assert_eq!(read_secret(Cursor::new("pw\r\n")).unwrap(), "pw");
        assert_eq!(read_secret(Cursor::new("pw")).unwrap(), "pw");
        assert_eq!(read_secret(Cursor::new("one\ntwo\n")).unwrap(), "one");
        assert_eq!(read_secret(Cursor::new(" spaced \n")).unwrap(), " spaced ");
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let runner = runner();
        let encoded = hash(&runner, "correct-horse").await;
        assert!(encoded.starts_with("$2b$04$"));

        let outcome = runner
            .run(Commands::Verify { hash: encoded.clone() }, stdin("correct-horse"))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::ok("match"));

        let outcome = runner
            .run(Commands::Verify { hash: encoded }, stdin("wrong-horse"))
            .await
            .unwrap();
        assert_eq!(outcome.message, "mismatch");
        assert_eq!(outcome.exit_code, EXIT_MISMATCH);
    }

    #[tokio::test]
    async fn test_hash_overrides() {
        let outcome = runner()
            .run(
                Commands::Hash {
                    cost: Some(5),
                    algorithm: None,
                },
                stdin("secret"),
            )
            .await
            .unwrap();
        assert!(outcome.message.starts_with("$2b$05$"));

        let outcome = runner()
            .run(
                Commands::Hash {
                    cost: None,
                    algorithm: Some(HashAlgorithm::Argon2id),
                },
                stdin("secret"),
            )
            .await
            .unwrap();
        assert!(outcome.message.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_hash_rejects_bad_input() {
        let err = runner()
            .run(
                Commands::Hash {
                    cost: Some(40),
                    algorithm: None,
                },
                stdin("secret"),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("between 4 and 31"));

        assert!(
            runner()
                .run(
                    Commands::Hash {
                        cost: None,
                        algorithm: None,
                    },
                    stdin(""),
                )
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_verify_malformed_hash() {
        let outcome = runner()
            .run(
                Commands::Verify {
                    hash: "not-a-valid-hash".to_string(),
                },
                stdin("anything"),
            )
            .await
            .unwrap();
        assert_eq!(outcome.exit_code, EXIT_MALFORMED);
        assert!(outcome.is_failure());
    }

    #[tokio::test]
    async fn test_verify_empty_secret_is_mismatch() {
        let runner = runner();
        let encoded = hash(&runner, "secret").await;
        let outcome = runner
            .run(Commands::Verify { hash: encoded }, stdin(""))
            .await
            .unwrap();
        assert_eq!(outcome.exit_code, EXIT_MISMATCH);
    }

    #[tokio::test]
    async fn test_inspect() {
        let runner = runner();
        let encoded = hasher::generate_hash("secret", Some(4)).unwrap();

        let outcome = runner
            .run(
                Commands::Inspect {
                    hash: encoded.clone(),
                    json: false,
                },
                Cursor::new(Vec::new()),
            )
            .await
            .unwrap();
        assert_eq!(
            outcome.message,
            "algorithm: bcrypt\ncost: 4\nneeds_rehash: false"
        );

        // Production settings want cost 10
        let strict = CommandRunner::new(AuthConfig::default());
        let outcome = strict
            .run(
                Commands::Inspect {
                    hash: encoded,
                    json: true,
                },
                Cursor::new(Vec::new()),
            )
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&outcome.message).unwrap();
        assert_eq!(value["algorithm"], "bcrypt");
        assert_eq!(value["cost"], 4);
        assert_eq!(value["needs_rehash"], true);
        assert!(value.get("argon2").is_none());
    }

    #[test]
    fn test_inspect_argon2id() {
        let hasher = CredentialHasher::new(
            HasherConfig::development().with_algorithm(HashAlgorithm::Argon2id),
        );
        let hashed = hasher
            .hash(&ClearTextPassword::new("secret").unwrap())
            .unwrap();

        let inspection = inspect(&hasher, &hashed);
        assert_eq!(inspection.algorithm, HashAlgorithm::Argon2id);
        assert_eq!(inspection.cost, None);
        assert_eq!(inspection.argon2, Some(HasherConfig::development().argon2));
        assert!(!inspection.needs_rehash);
        assert!(inspection.render_text().contains("memory_kib: 1024"));
    }
}
