//! PostgreSQL-backed [`UserRepository`].
//!
//! Uniqueness of usernames and emails is enforced by database constraints;
//! violations surface as [`UserRepositoryError::Duplicate`].

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use mockable::Clock;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, ProfileChanges, UserAccount, UserId};

use super::diesel_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        return UserRepositoryError::duplicate(constraint);
    }
    map_basic_diesel_error(error, UserRepositoryError::query, UserRepositoryError::connection)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(UserAccount::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(UserAccount::from))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(UserAccount::from))
    }

    async fn create(&self, user: NewUser) -> Result<UserAccount, UserRepositoryError> {
        let account = UserAccount::create(UserId::random(), user, self.clock.utc());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&UserRow::from(&account))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(account)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let now = self.clock.utc();
        let user_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let row: Option<UserRow> = users::table
                    .find(user_id)
                    .select(UserRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Ok(None);
                };
                let mut account = UserAccount::from(row);
                changes.apply_to(&mut account.user, now);
                diesel::update(users::table.find(user_id))
                    .set(&UserProfileUpdate {
                        username: &account.user.username,
                        bio: &account.user.bio,
                        avatar: account.user.avatar.as_deref(),
                        updated_at: account.user.updated_at,
                    })
                    .execute(conn)
                    .await?;
                Ok(Some(account))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
