//! PostgreSQL-backed [`ObjectTemplateRepository`].
//!
//! Seeding relies on the `(object_type, name)` unique constraint: conflicting
//! inserts are skipped rather than failing.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{ObjectTemplateRepository, ObjectTemplateRepositoryError};
use crate::domain::{NewObjectTemplate, ObjectTemplate, ObjectTemplateId};

use super::diesel_error_mapping::{
    decode_failure_message, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{ObjectTemplateRow, RowDecodeError};
use super::pool::{DbPool, PoolError};
use super::schema::object_templates;

#[derive(Clone)]
pub struct DieselObjectTemplateRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselObjectTemplateRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> ObjectTemplateRepositoryError {
    map_basic_pool_error(error, ObjectTemplateRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ObjectTemplateRepositoryError {
    map_basic_diesel_error(
        error,
        ObjectTemplateRepositoryError::query,
        ObjectTemplateRepositoryError::connection,
    )
}

fn map_decode_error(error: &RowDecodeError) -> ObjectTemplateRepositoryError {
    ObjectTemplateRepositoryError::query(decode_failure_message(error))
}

#[async_trait]
impl ObjectTemplateRepository for DieselObjectTemplateRepository {
    async fn list(
        &self,
        category: Option<String>,
    ) -> Result<Vec<ObjectTemplate>, ObjectTemplateRepositoryError> {
        let mut query = object_templates::table
            .select(ObjectTemplateRow::as_select())
            .order_by((object_templates::created_at.asc(), object_templates::name.asc()))
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(object_templates::category.eq(category));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ObjectTemplateRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| ObjectTemplate::try_from(row).map_err(|err| map_decode_error(&err)))
            .collect()
    }

    async fn insert_if_absent(
        &self,
        entry: NewObjectTemplate,
    ) -> Result<bool, ObjectTemplateRepositoryError> {
        let created = ObjectTemplate::create(ObjectTemplateId::random(), entry, self.clock.utc());
        let row = ObjectTemplateRow::try_from(&created).map_err(|err| map_decode_error(&err))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(object_templates::table)
            .values(&row)
            .on_conflict((object_templates::object_type, object_templates::name))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }
}
