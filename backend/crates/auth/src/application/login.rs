//! Login Use Case
//!
//! Authenticates a user by user name or email and password.

use std::sync::Arc;

use hasher::CredentialHasher;
use tokio::sync::OnceCell;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId,
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    /// User name or email
    pub identifier: String,
    /// Password
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user_id: UserId,
    pub user_role: UserRole,
    /// Whether the stored hash was upgraded to the current settings
    pub rehashed: bool,
}

/// Secret behind the placeholder hash checked when there is no usable user
const PLACEHOLDER_SECRET: &str = "placeholder-credential";

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    user_repo: Arc<R>,
    hasher: CredentialHasher,
    /// Hash made with the configured settings, built on first use
    placeholder: OnceCell<UserPassword>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: Arc<R>, hasher: CredentialHasher) -> Self {
        Self {
            user_repo,
            hasher,
            placeholder: OnceCell::new(),
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        self.authenticate(input).await.inspect_err(AuthError::log)
    }

    async fn authenticate(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Every rejection below costs one hash verification
        let Some(mut user) = self.find_user(&input.identifier).await? else {
            self.verify_placeholder(input.password).await;
            return Err(AuthError::InvalidCredentials);
        };

        if !user.can_login() {
            self.verify_placeholder(input.password).await;
            return Err(AuthError::InvalidCredentials);
        }

        // Keep a second copy only when the hash is going to be upgraded
        let rehash_input = if user.password.needs_rehash(&self.hasher) {
            RawPassword::new(input.password.clone()).ok()
        } else {
            None
        };

        let Ok(raw_password) = RawPassword::new(input.password) else {
            self.verify_placeholder(String::new()).await;
            return Err(AuthError::InvalidCredentials);
        };

        let valid = user
            .password
            .verify_async(&self.hasher, raw_password)
            .await?;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let rehashed = match rehash_input {
            Some(raw) => self.upgrade_hash(&mut user, raw).await,
            None => false,
        };

        tracing::info!(
            user_id = %user.user_id,
            user_role = %user.user_role,
            rehashed,
            "User logged in"
        );

        Ok(LoginOutput {
            user_id: user.user_id,
            user_role: user.user_role,
            rehashed,
        })
    }

    /// Look up by email when the identifier contains `@`, otherwise by user name
    ///
    /// Identifiers that cannot be valid are treated as unknown users.
    async fn find_user(&self, identifier: &str) -> AuthResult<Option<User>> {
        if Email::looks_like(identifier) {
            let Ok(email) = Email::new(identifier) else {
                return Ok(None);
            };
            self.user_repo.find_by_email(&email).await
        } else {
            let Ok(user_name) = UserName::new(identifier) else {
                return Ok(None);
            };
            self.user_repo.find_by_user_name(&user_name).await
        }
    }

    /// Verify against the placeholder hash when there is no usable user
    ///
    /// The outcome is discarded. An empty password is replaced by the
    /// placeholder secret.
    async fn verify_placeholder(&self, password: String) {
        let result = async {
            let stored = self
                .placeholder
                .get_or_try_init(|| async {
                    let raw = RawPassword::new(PLACEHOLDER_SECRET.to_string())?;
                    UserPassword::hash_async(&self.hasher, raw).await
                })
                .await?;

            let raw = match RawPassword::new(password) {
                Ok(raw) => raw,
                Err(_) => RawPassword::new(PLACEHOLDER_SECRET.to_string())?,
            };
            stored.verify_async(&self.hasher, raw).await
        }
        .await;

        if let Err(e) = result {
            tracing::debug!(error = %e, "Placeholder verification failed");
        }
    }

    /// Rehash with the current settings
    ///
    /// Best effort: a failure is logged and the login still succeeds.
    async fn upgrade_hash(&self, user: &mut User, raw: RawPassword) -> bool {
        let result = async {
            let password = UserPassword::hash_async(&self.hasher, raw).await?;
            self.user_repo
                .update_password(&user.user_id, &password)
                .await?;
            Ok::<_, AuthError>(password)
        }
        .await;

        match result {
            Ok(password) => {
                user.set_password(password);
                tracing::info!(
                    user_id = %user.user_id,
                    algorithm = %self.hasher.config().algorithm,
                    "Password hash upgraded"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user.user_id,
                    error = %e,
                    "Password hash upgrade failed, continuing anyway"
                );
                false
            }
        }
    }
}
