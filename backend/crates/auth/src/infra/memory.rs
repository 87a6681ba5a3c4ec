//! In-Memory Repository Implementation
//!
//! Keeps user records in a `HashMap` behind a Tokio `RwLock`. Records hold
//! the password as the raw stored string, the same shape a database row has,
//! so a corrupt hash is detected when a record is turned back into a `User`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId, email::Email, user_name::UserName, user_password::UserPassword,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record as-is, bypassing validation of the stored hash
    ///
    /// Used to seed users whose hashes come from elsewhere.
    pub async fn insert_record(&self, record: UserRecord) -> AuthResult<()> {
        let mut users = self.users.write().await;
        ensure_unique(&users, &record)?;
        users.insert(record.user_id, record);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    async fn find_by<P>(&self, predicate: P) -> AuthResult<Option<User>>
    where
        P: Fn(&UserRecord) -> bool,
    {
        let users = self.users.read().await;
        users
            .values()
            .find(|record| predicate(record))
            .cloned()
            .map(UserRecord::into_user)
            .transpose()
    }
}

fn ensure_unique(users: &HashMap<UserId, UserRecord>, record: &UserRecord) -> AuthResult<()> {
    for existing in users.values() {
        if existing.user_name_canonical == record.user_name_canonical {
            return Err(AuthError::UserNameTaken);
        }
        if existing.email == record.email {
            return Err(AuthError::EmailTaken);
        }
    }
    Ok(())
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.insert_record(UserRecord::from(user)).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.find_by(|record| record.email == email.as_str()).await
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        self.find_by(|record| record.user_name_canonical == user_name.canonical())
            .await
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|record| record.email == email.as_str()))
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|record| record.user_name_canonical == user_name.canonical()))
    }

    async fn update_password(&self, user_id: &UserId, password: &UserPassword) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let record = users.get_mut(user_id).ok_or(AuthError::UserNotFound)?;

        record.password = password.as_str().to_string();
        record.updated_at = Utc::now();

        Ok(())
    }
}

// ============================================================================
// Record Type
// ============================================================================

/// Stored form of a user
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: UserId,
    pub name: Option<String>,
    pub user_name: String,
    pub user_name_canonical: String,
    pub email: String,
    /// Encoded password hash
    pub password: String,
    pub user_role: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a record for an existing hash (e.g. imported from another system)
    pub fn with_password_hash(
        user_name: &UserName,
        email: &Email,
        password: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            name: None,
            user_name: user_name.original().to_string(),
            user_name_canonical: user_name.canonical().to_string(),
            email: email.as_str().to_string(),
            password: password.into(),
            user_role: UserRole::default().code().to_string(),
            avatar: None,
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn into_user(self) -> AuthResult<User> {
        let user_name = UserName::new(&self.user_name)
            .map_err(|e| AuthError::Internal(format!("Invalid user_name: {}", e)))?;

        let password = UserPassword::from_storage(self.password).inspect_err(|_| {
            tracing::error!(user_id = %self.user_id, "Stored password hash is malformed");
        })?;

        Ok(User {
            user_id: self.user_id,
            name: self.name,
            user_name,
            email: Email::from_storage(self.email),
            password,
            user_role: UserRole::from_code(&self.user_role).unwrap_or_default(),
            avatar: self.avatar,
            phone: self.phone,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name.clone(),
            user_name: user.user_name.original().to_string(),
            user_name_canonical: user.user_name.canonical().to_string(),
            email: user.email.as_str().to_string(),
            password: user.password.as_str().to_string(),
            user_role: user.user_role.code().to_string(),
            avatar: user.avatar.clone(),
            phone: user.phone.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;
    use hasher::{CredentialHasher, HasherConfig};

    fn sample_user(user_name: &str, email: &str) -> User {
        let hasher = CredentialHasher::new(HasherConfig::development());
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        User::new(
            None,
            UserName::new(user_name).unwrap(),
            Email::new(email).unwrap(),
            UserPassword::hash(&hasher, &raw).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("Alice", "alice@example.com");
        repo.create(&user).await.unwrap();

        let by_name = repo
            .find_by_user_name(&UserName::new("alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.user_id, user.user_id);
        assert_eq!(by_name.user_name.original(), "Alice");

        let by_email = repo
            .find_by_email(&Email::new("ALICE@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.user_id, user.user_id);
        assert_eq!(by_email.password, user.password);

        assert!(
            repo.find_by_email(&Email::new("bob@example.com").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_uniqueness() {
        let repo = InMemoryUserRepository::new();
        repo.create(&sample_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(matches!(
            repo.create(&sample_user("ALICE", "other@example.com")).await,
            Err(AuthError::UserNameTaken)
        ));
        assert!(matches!(
            repo.create(&sample_user("bob", "alice@example.com")).await,
            Err(AuthError::EmailTaken)
        ));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_password() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("alice", "alice@example.com");
        repo.create(&user).await.unwrap();

        let replacement = sample_user("carol", "carol@example.com").password;
        repo.update_password(&user.user_id, &replacement)
            .await
            .unwrap();

        let stored = repo
            .find_by_user_name(&user.user_name)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.password, replacement);

        assert!(matches!(
            repo.update_password(&UserId::new(), &replacement).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_hash_surfaces_on_load() {
        let repo = InMemoryUserRepository::new();
        let user_name = UserName::new("legacy").unwrap();
        let email = Email::new("legacy@example.com").unwrap();
        repo.insert_record(UserRecord::with_password_hash(
            &user_name,
            &email,
            "plaintext-from-old-system",
        ))
        .await
        .unwrap();

        // Existence checks do not parse the hash
        assert!(repo.exists_by_email(&email).await.unwrap());

        assert!(matches!(
            repo.find_by_user_name(&user_name).await,
            Err(AuthError::CorruptCredential)
        ));
    }

    #[test]
    fn test_record_roundtrip() {
        let user = sample_user("Alice", "alice@example.com");
        let restored = UserRecord::from(&user).into_user().unwrap();

        assert_eq!(restored.user_id, user.user_id);
        assert_eq!(restored.user_name, user.user_name);
        assert_eq!(restored.email, user.email);
        assert_eq!(restored.user_role, user.user_role);
        assert!(restored.is_active);
    }
}
