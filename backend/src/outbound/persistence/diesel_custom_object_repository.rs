//! PostgreSQL-backed [`CustomObjectRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{CustomObjectRepository, CustomObjectRepositoryError};
use crate::domain::{CustomObject, CustomObjectId, NewCustomObject, UserId};

use super::diesel_error_mapping::{
    decode_failure_message, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CustomObjectRow, RowDecodeError};
use super::pool::{DbPool, PoolError};
use super::schema::custom_objects;

#[derive(Clone)]
pub struct DieselCustomObjectRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselCustomObjectRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> CustomObjectRepositoryError {
    map_basic_pool_error(error, CustomObjectRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CustomObjectRepositoryError {
    map_basic_diesel_error(
        error,
        CustomObjectRepositoryError::query,
        CustomObjectRepositoryError::connection,
    )
}

fn map_decode_error(error: &RowDecodeError) -> CustomObjectRepositoryError {
    CustomObjectRepositoryError::query(decode_failure_message(error))
}

#[async_trait]
impl CustomObjectRepository for DieselCustomObjectRepository {
    async fn list_visible(
        &self,
        viewer: Option<UserId>,
    ) -> Result<Vec<CustomObject>, CustomObjectRepositoryError> {
        let mut query = custom_objects::table
            .select(CustomObjectRow::as_select())
            .order_by((
                custom_objects::usage_count.desc(),
                custom_objects::created_at.desc(),
            ))
            .into_boxed();
        query = match viewer {
            Some(viewer) => query.filter(
                custom_objects::is_public
                    .eq(true)
                    .or(custom_objects::owner_id.eq(*viewer.as_uuid())),
            ),
            None => query.filter(custom_objects::is_public.eq(true)),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CustomObjectRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| CustomObject::try_from(row).map_err(|err| map_decode_error(&err)))
            .collect()
    }

    async fn find_by_id(
        &self,
        id: &CustomObjectId,
    ) -> Result<Option<CustomObject>, CustomObjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CustomObjectRow> = custom_objects::table
            .find(id.as_uuid())
            .select(CustomObjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(CustomObject::try_from)
            .transpose()
            .map_err(|err| map_decode_error(&err))
    }

    async fn create(
        &self,
        object: NewCustomObject,
    ) -> Result<CustomObject, CustomObjectRepositoryError> {
        let created = CustomObject::create(CustomObjectId::random(), object, self.clock.utc());
        let row = CustomObjectRow::try_from(&created).map_err(|err| map_decode_error(&err))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(custom_objects::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(created)
    }

    async fn delete(&self, id: &CustomObjectId) -> Result<bool, CustomObjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(custom_objects::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
