//! PostgreSQL-backed [`LayoutStore`].
//!
//! Object arrays live in a JSONB column. Updates and forks run inside a
//! transaction holding a row lock on the affected layout, so concurrent
//! forks never lose a `fork_count` increment.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{LayoutStore, LayoutStoreError};
use crate::domain::{ForkLayout, Layout, LayoutChanges, LayoutId, NewLayout, UserId};

use super::diesel_error_mapping::{
    TransactionError, decode_failure_message, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{LayoutRow, LayoutUpdate, RowDecodeError, counter_to_db, encode_json};
use super::pool::{DbPool, PoolError};
use super::schema::layouts;

/// Diesel implementation of the layout store.
#[derive(Clone)]
pub struct DieselLayoutStore {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselLayoutStore {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> LayoutStoreError {
    map_basic_pool_error(error, LayoutStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LayoutStoreError {
    map_basic_diesel_error(error, LayoutStoreError::query, LayoutStoreError::connection)
}

fn map_decode_error(error: &RowDecodeError) -> LayoutStoreError {
    LayoutStoreError::query(decode_failure_message(error))
}

fn map_transaction_error(error: TransactionError) -> LayoutStoreError {
    error.map_into(LayoutStoreError::query, LayoutStoreError::connection)
}

fn rows_to_layouts(rows: Vec<LayoutRow>) -> Result<Vec<Layout>, LayoutStoreError> {
    rows.into_iter()
        .map(|row| Layout::try_from(row).map_err(|err| map_decode_error(&err)))
        .collect()
}

#[async_trait]
impl LayoutStore for DieselLayoutStore {
    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Layout>, LayoutStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = layouts::table
            .select(LayoutRow::as_select())
            .order_by((layouts::created_at.asc(), layouts::id.asc()))
            .into_boxed();
        if let Some(owner) = owner {
            query = query.filter(layouts::owner_id.eq(*owner.as_uuid()));
        }
        let rows: Vec<LayoutRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_layouts(rows)
    }

    async fn list_public(&self) -> Result<Vec<Layout>, LayoutStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LayoutRow> = layouts::table
            .filter(layouts::is_public.eq(true))
            .select(LayoutRow::as_select())
            .order_by(layouts::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_layouts(rows)
    }

    async fn get(&self, id: &LayoutId) -> Result<Option<Layout>, LayoutStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LayoutRow> = layouts::table
            .find(id.as_uuid())
            .select(LayoutRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Layout::try_from)
            .transpose()
            .map_err(|err| map_decode_error(&err))
    }

    async fn create(&self, layout: NewLayout) -> Result<Layout, LayoutStoreError> {
        let created = Layout::create(LayoutId::random(), layout, self.clock.utc());
        let row = LayoutRow::try_from(&created).map_err(|err| map_decode_error(&err))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(layouts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(layout_id = %created.id, "layout inserted");
        Ok(created)
    }

    async fn update(
        &self,
        id: &LayoutId,
        changes: LayoutChanges,
    ) -> Result<Option<Layout>, LayoutStoreError> {
        let now = self.clock.utc();
        let layout_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TransactionError, _>(|conn| {
            async move {
                let row: Option<LayoutRow> = layouts::table
                    .find(layout_id)
                    .select(LayoutRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Ok(None);
                };
                let mut layout = Layout::try_from(row)?;
                changes.apply_to(&mut layout, now);
                diesel::update(layouts::table.find(layout_id))
                    .set(&LayoutUpdate {
                        name: layout.name.clone(),
                        objects: encode_json("layouts.objects", &layout.objects)?,
                        is_public: layout.is_public,
                        updated_at: layout.updated_at,
                    })
                    .execute(conn)
                    .await?;
                Ok(Some(layout))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_transaction_error)
    }

    async fn delete(&self, id: &LayoutId) -> Result<bool, LayoutStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(layouts::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn exists(&self, id: &LayoutId) -> Result<bool, LayoutStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(layouts::table.find(id.as_uuid())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn fork(&self, request: ForkLayout) -> Result<Option<Layout>, LayoutStoreError> {
        let now = self.clock.utc();
        let source_id = *request.source.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TransactionError, _>(|conn| {
            async move {
                let row: Option<LayoutRow> = layouts::table
                    .find(source_id)
                    .select(LayoutRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Ok(None);
                };
                let mut source = Layout::try_from(row)?;
                source.fork_count = source.fork_count.saturating_add(1);
                diesel::update(layouts::table.find(source_id))
                    .set(layouts::fork_count.eq(counter_to_db(source.fork_count)))
                    .execute(conn)
                    .await?;

                let fork = source.fork(LayoutId::random(), request, now);
                diesel::insert_into(layouts::table)
                    .values(&LayoutRow::try_from(&fork)?)
                    .execute(conn)
                    .await?;
                Ok(Some(fork))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_transaction_error)
    }
}
