//! PostgreSQL-backed [`CommentRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use mockable::Clock;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, LayoutId, NewComment, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommentLikesUpdate, CommentRow, counter_to_db};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_basic_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    map_basic_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list_top_level(
        &self,
        layout_id: &LayoutId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::layout_id.eq(layout_id.as_uuid()))
            .filter(comments::parent_id.is_null())
            .select(CommentRow::as_select())
            .order_by(comments::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn list_replies(
        &self,
        parent: &CommentId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::parent_id.eq(parent.as_uuid()))
            .select(CommentRow::as_select())
            .order_by(comments::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommentRow> = comments::table
            .find(id.as_uuid())
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Comment::from))
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError> {
        let created = Comment::create(CommentId::random(), comment, self.clock.utc());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comments::table)
            .values(&CommentRow::from(&created))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(created)
    }

    async fn update_content(
        &self,
        id: &CommentId,
        content: String,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommentRow> = diesel::update(comments::table.find(id.as_uuid()))
            .set((
                comments::content.eq(content),
                comments::updated_at.eq(self.clock.utc()),
            ))
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Comment::from))
    }

    async fn toggle_like(
        &self,
        id: &CommentId,
        user: UserId,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let now = self.clock.utc();
        let comment_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let row: Option<CommentRow> = comments::table
                    .find(comment_id)
                    .select(CommentRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Ok(None);
                };
                let mut comment = Comment::from(row);
                comment.toggle_like(user, now);
                diesel::update(comments::table.find(comment_id))
                    .set(&CommentLikesUpdate {
                        likes: counter_to_db(comment.likes),
                        liked_by: comment.liked_by.iter().map(|fan| *fan.as_uuid()).collect(),
                        updated_at: comment.updated_at,
                    })
                    .execute(conn)
                    .await?;
                Ok(Some(comment))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete_with_replies(&self, id: &CommentId) -> Result<usize, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = *id.as_uuid();
        diesel::delete(
            comments::table.filter(
                comments::id
                    .eq(target)
                    .or(comments::parent_id.eq(target)),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
