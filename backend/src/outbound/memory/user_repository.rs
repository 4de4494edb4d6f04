//! In-memory [`UserRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, ProfileChanges, UserAccount, UserId};

pub struct InMemoryUserRepository {
    accounts: RwLock<Vec<UserAccount>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
            clock,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|account| account.user.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| account.user.email == email)
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| account.user.username == username)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserAccount, UserRepositoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .iter()
            .any(|account| account.user.email == user.email || account.user.username == user.username)
        {
            return Err(UserRepositoryError::duplicate(user.username));
        }
        let account = UserAccount::create(UserId::random(), user, self.clock.utc());
        accounts.push(account.clone());
        Ok(account)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut accounts = self.accounts.write().await;
        if let Some(username) = changes.username.as_deref() {
            let taken = accounts
                .iter()
                .any(|account| account.user.id != *id && account.user.username == username);
            if taken {
                return Err(UserRepositoryError::duplicate(username));
            }
        }
        let Some(account) = accounts.iter_mut().find(|account| account.user.id == *id) else {
            return Ok(None);
        };
        changes.apply_to(&mut account.user, self.clock.utc());
        Ok(Some(account.clone()))
    }
}
