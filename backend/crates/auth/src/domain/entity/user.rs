//! User Entity
//!
//! The single user record shared by registration and login.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    UserId, email::Email, user_name::UserName, user_password::UserPassword,
    user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Display name (optional)
    pub name: Option<String>,
    /// User name (unique, for login)
    pub user_name: UserName,
    /// Email (unique, for login)
    pub email: Email,
    /// Stored password hash; the plaintext never reaches this struct
    pub password: UserPassword,
    /// Role (User, Manager, Admin)
    pub user_role: UserRole,
    /// Avatar URL
    pub avatar: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Whether the account may sign in
    pub is_active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with the default role
    pub fn new(
        name: Option<String>,
        user_name: UserName,
        email: Email,
        password: UserPassword,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            user_name,
            email,
            password,
            user_role: UserRole::default(),
            avatar: None,
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored password hash
    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }

    /// Check if user can login
    pub fn can_login(&self) -> bool {
        self.is_active
    }
}
