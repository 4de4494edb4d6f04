//! In-memory [`CommentRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, LayoutId, NewComment, UserId};

pub struct InMemoryCommentRepository {
    comments: RwLock<Vec<Comment>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCommentRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            comments: RwLock::new(Vec::new()),
            clock,
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_top_level(
        &self,
        layout_id: &LayoutId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let comments = self.comments.read().await;
        let mut top_level: Vec<Comment> = comments
            .iter()
            .rev()
            .filter(|comment| comment.layout_id == *layout_id && comment.is_top_level())
            .cloned()
            .collect();
        top_level.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(top_level)
    }

    async fn list_replies(
        &self,
        parent: &CommentId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let comments = self.comments.read().await;
        let mut replies: Vec<Comment> = comments
            .iter()
            .filter(|comment| comment.parent == Some(*parent))
            .cloned()
            .collect();
        replies.sort_by(|left, right| left.created_at.cmp(&right.created_at));
        Ok(replies)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let comments = self.comments.read().await;
        Ok(comments.iter().find(|comment| comment.id == *id).cloned())
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError> {
        let created = Comment::create(CommentId::random(), comment, self.clock.utc());
        self.comments.write().await.push(created.clone());
        Ok(created)
    }

    async fn update_content(
        &self,
        id: &CommentId,
        content: String,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut comments = self.comments.write().await;
        let Some(comment) = comments.iter_mut().find(|comment| comment.id == *id) else {
            return Ok(None);
        };
        comment.content = content;
        comment.updated_at = self.clock.utc();
        Ok(Some(comment.clone()))
    }

    async fn toggle_like(
        &self,
        id: &CommentId,
        user: UserId,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut comments = self.comments.write().await;
        let Some(comment) = comments.iter_mut().find(|comment| comment.id == *id) else {
            return Ok(None);
        };
        comment.toggle_like(user, self.clock.utc());
        Ok(Some(comment.clone()))
    }

    async fn delete_with_replies(&self, id: &CommentId) -> Result<usize, CommentRepositoryError> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|comment| comment.id != *id && comment.parent != Some(*id));
        Ok(before - comments.len())
    }
}
