//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, LayoutId, NewComment, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "comment repository query failed: {message}",
    }
}

/// Storage for comments and their replies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Top-level comments on a layout, newest first.
    async fn list_top_level(
        &self,
        layout_id: &LayoutId,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Direct replies to a comment, oldest first.
    async fn list_replies(&self, parent: &CommentId)
    -> Result<Vec<Comment>, CommentRepositoryError>;

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    async fn create(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Replace the content; `None` when the comment does not exist.
    async fn update_content(
        &self,
        id: &CommentId,
        content: String,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Toggle `user`'s like atomically; `None` when the comment does not exist.
    async fn toggle_like(
        &self,
        id: &CommentId,
        user: UserId,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Remove a comment and its direct replies; returns the number removed.
    async fn delete_with_replies(&self, id: &CommentId) -> Result<usize, CommentRepositoryError>;
}
