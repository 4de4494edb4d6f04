//! PostgreSQL-backed [`TemplateRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use mockable::Clock;

use crate::domain::ports::{TemplateRepository, TemplateRepositoryError};
use crate::domain::{NewTemplate, Template, TemplateChanges, TemplateFilter, TemplateId};

use super::diesel_error_mapping::{
    TransactionError, decode_failure_message, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{RowDecodeError, TemplateRow, TemplateUpdate, encode_json};
use super::pool::{DbPool, PoolError};
use super::schema::templates;

#[derive(Clone)]
pub struct DieselTemplateRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselTemplateRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> TemplateRepositoryError {
    map_basic_pool_error(error, TemplateRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TemplateRepositoryError {
    map_basic_diesel_error(
        error,
        TemplateRepositoryError::query,
        TemplateRepositoryError::connection,
    )
}

fn map_decode_error(error: &RowDecodeError) -> TemplateRepositoryError {
    TemplateRepositoryError::query(decode_failure_message(error))
}

fn decode(row: Option<TemplateRow>) -> Result<Option<Template>, TemplateRepositoryError> {
    row.map(Template::try_from)
        .transpose()
        .map_err(|err| map_decode_error(&err))
}

#[async_trait]
impl TemplateRepository for DieselTemplateRepository {
    async fn list(&self, filter: TemplateFilter) -> Result<Vec<Template>, TemplateRepositoryError> {
        let mut query = templates::table
            .select(TemplateRow::as_select())
            .order_by((templates::usage_count.desc(), templates::created_at.desc()))
            .into_boxed();
        if let Some(category) = filter.category() {
            query = query.filter(templates::category.eq(category.to_owned()));
        }
        query = match filter.viewer() {
            Some(viewer) => query.filter(
                templates::is_public
                    .eq(true)
                    .or(templates::owner_id.is_not_distinct_from(*viewer.as_uuid())),
            ),
            None => query.filter(templates::is_public.eq(true)),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TemplateRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| Template::try_from(row).map_err(|err| map_decode_error(&err)))
            .collect()
    }

    async fn find_by_id(
        &self,
        id: &TemplateId,
    ) -> Result<Option<Template>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TemplateRow> = templates::table
            .find(id.as_uuid())
            .select(TemplateRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        decode(row)
    }

    async fn record_use(
        &self,
        id: &TemplateId,
    ) -> Result<Option<Template>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TemplateRow> = diesel::update(templates::table.find(id.as_uuid()))
            .set(templates::usage_count.eq(templates::usage_count + 1))
            .returning(TemplateRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        decode(row)
    }

    async fn create(&self, template: NewTemplate) -> Result<Template, TemplateRepositoryError> {
        let created = Template::create(TemplateId::random(), template, self.clock.utc());
        let row = TemplateRow::try_from(&created).map_err(|err| map_decode_error(&err))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(templates::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(created)
    }

    async fn update(
        &self,
        id: &TemplateId,
        changes: TemplateChanges,
    ) -> Result<Option<Template>, TemplateRepositoryError> {
        let now = self.clock.utc();
        let template_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TransactionError, _>(|conn| {
            async move {
                let row: Option<TemplateRow> = templates::table
                    .find(template_id)
                    .select(TemplateRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Ok(None);
                };
                let mut template = Template::try_from(row)?;
                changes.apply_to(&mut template, now);
                diesel::update(templates::table.find(template_id))
                    .set(&TemplateUpdate {
                        name: template.name.clone(),
                        description: template.description.clone(),
                        category: template.category.clone(),
                        objects: encode_json("templates.objects", &template.objects)?,
                        thumbnail_url: template.thumbnail_url.clone(),
                        is_public: template.is_public,
                        updated_at: template.updated_at,
                    })
                    .execute(conn)
                    .await?;
                Ok(Some(template))
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| err.map_into(TemplateRepositoryError::query, TemplateRepositoryError::connection))
    }

    async fn delete(&self, id: &TemplateId) -> Result<bool, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(templates::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
