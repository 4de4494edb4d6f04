//! User accounts.

use chrono::{DateTime, Utc};

use crate::domain::UserId;

/// Public view of a registered user. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Unique across users.
    pub username: String,
    /// Unique across users.
    pub email: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with their bcrypt password hash.
///
/// Only repositories and the auth service handle this type; responses are
/// always built from [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: String,
}

/// Input for account creation; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileChanges {
    /// Apply the provided fields and stamp `updated_at`.
    pub fn apply_to(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
        user.updated_at = now;
    }
}

impl UserAccount {
    /// Materialise a freshly registered account with an empty bio.
    pub fn create(id: UserId, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            user: User {
                id,
                username: new_user.username,
                email: new_user.email,
                bio: String::new(),
                avatar: None,
                created_at: now,
                updated_at: now,
            },
            password_hash: new_user.password_hash,
        }
    }
}
