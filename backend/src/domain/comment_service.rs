//! Comment threads on layouts.
//!
//! Threading is one level deep: replies attach to top-level comments only,
//! and deleting a top-level comment removes its replies.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{
    AuthenticatedUser, Comment, CommentId, CommentThread, Error, LayoutId, NewComment,
};

const COMMENT_NOT_FOUND: &str = "Comment not found";

/// Validated input for a new comment or reply.
#[derive(Debug, Clone, PartialEq)]
pub struct PostComment {
    pub layout_id: LayoutId,
    pub content: String,
    pub parent: Option<CommentId>,
}

/// Comment service enforcing threading depth and authorship.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    fn map_repository_error(error: CommentRepositoryError) -> Error {
        match error {
            CommentRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("comment repository unavailable: {message}"))
            }
            CommentRepositoryError::Query { message } => {
                Error::internal(format!("comment repository error: {message}"))
            }
        }
    }

    async fn find_authored(
        &self,
        caller: &AuthenticatedUser,
        id: &CommentId,
        action: &str,
    ) -> Result<Comment, Error> {
        let comment = self
            .comments
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(COMMENT_NOT_FOUND))?;
        if comment.author != caller.id {
            return Err(Error::forbidden(format!(
                "Not authorized to {action} this comment"
            )));
        }
        Ok(comment)
    }

    /// Top-level comments newest first, each with replies oldest first.
    pub async fn threads(&self, layout_id: &LayoutId) -> Result<Vec<CommentThread>, Error> {
        let top_level = self
            .comments
            .list_top_level(layout_id)
            .await
            .map_err(Self::map_repository_error)?;
        let mut threads = Vec::with_capacity(top_level.len());
        for comment in top_level {
            let replies = self
                .comments
                .list_replies(&comment.id)
                .await
                .map_err(Self::map_repository_error)?;
            threads.push(CommentThread { comment, replies });
        }
        Ok(threads)
    }

    /// Post a comment as `caller`.
    ///
    /// A reply's parent must exist, be top-level, and belong to the same layout.
    pub async fn post(
        &self,
        caller: &AuthenticatedUser,
        request: PostComment,
    ) -> Result<Comment, Error> {
        if let Some(parent_id) = request.parent {
            let parent = self
                .comments
                .find_by_id(&parent_id)
                .await
                .map_err(Self::map_repository_error)?
                .ok_or_else(|| Error::not_found("Parent comment not found"))?;
            if !parent.is_top_level() {
                return Err(Error::invalid_request(
                    "Replies can only be added to top-level comments",
                ));
            }
            if parent.layout_id != request.layout_id {
                return Err(Error::invalid_request(
                    "Parent comment belongs to a different layout",
                ));
            }
        }

        let comment = self
            .comments
            .create(NewComment {
                layout_id: request.layout_id,
                author: caller.id,
                username: caller.username.clone(),
                content: request.content,
                parent: request.parent,
            })
            .await
            .map_err(Self::map_repository_error)?;
        info!(comment_id = %comment.id, layout_id = %comment.layout_id, "comment posted");
        Ok(comment)
    }

    /// Replace the content of the caller's own comment.
    pub async fn edit(
        &self,
        caller: &AuthenticatedUser,
        id: &CommentId,
        content: String,
    ) -> Result<Comment, Error> {
        self.find_authored(caller, id, "edit").await?;
        self.comments
            .update_content(id, content)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(COMMENT_NOT_FOUND))
    }

    /// Like or unlike a comment on behalf of the caller.
    pub async fn toggle_like(
        &self,
        caller: &AuthenticatedUser,
        id: &CommentId,
    ) -> Result<Comment, Error> {
        self.comments
            .toggle_like(id, caller.id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(COMMENT_NOT_FOUND))
    }

    /// Delete the caller's own comment together with its replies.
    pub async fn delete(&self, caller: &AuthenticatedUser, id: &CommentId) -> Result<(), Error> {
        self.find_authored(caller, id, "delete").await?;
        let removed = self
            .comments
            .delete_with_replies(id)
            .await
            .map_err(Self::map_repository_error)?;
        info!(comment_id = %id, removed, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockCommentRepository;
    use crate::domain::{ErrorCode, UserId};
    use chrono::Utc;

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::random(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
        }
    }

    fn comment(author: UserId, layout_id: LayoutId, parent: Option<CommentId>) -> Comment {
        Comment::create(
            CommentId::random(),
            NewComment {
                layout_id,
                author,
                username: "someone".to_owned(),
                content: "Looks great".to_owned(),
                parent,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn replies_to_replies_are_rejected() {
        let layout_id = LayoutId::random();
        let reply = comment(UserId::random(), layout_id, Some(CommentId::random()));
        let reply_id = reply.id;
        let mut repo = MockCommentRepository::new();
        repo.expect_find_by_id().return_once(move |_| Ok(Some(reply)));
        repo.expect_create().never();

        let err = CommentService::new(Arc::new(repo))
            .post(
                &caller(),
                PostComment {
                    layout_id,
                    content: "nested".to_owned(),
                    parent: Some(reply_id),
                },
            )
            .await
            .expect_err("second-level reply");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn post_records_author_from_token() {
        let caller = caller();
        let expected_author = caller.id;
        let mut repo = MockCommentRepository::new();
        repo.expect_create()
            .withf(move |new_comment| {
                new_comment.author == expected_author && new_comment.username == "ada"
            })
            .return_once(|new_comment| {
                Ok(Comment::create(CommentId::random(), new_comment, Utc::now()))
            });

        let posted = CommentService::new(Arc::new(repo))
            .post(
                &caller,
                PostComment {
                    layout_id: LayoutId::random(),
                    content: "Nice".to_owned(),
                    parent: None,
                },
            )
            .await
            .expect("comment posted");

        assert_eq!(posted.author, expected_author);
    }

    #[tokio::test]
    async fn deleting_someone_elses_comment_is_forbidden() {
        let other = comment(UserId::random(), LayoutId::random(), None);
        let id = other.id;
        let mut repo = MockCommentRepository::new();
        repo.expect_find_by_id().return_once(move |_| Ok(Some(other)));
        repo.expect_delete_with_replies().never();

        let err = CommentService::new(Arc::new(repo))
            .delete(&caller(), &id)
            .await
            .expect_err("not the author");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "Not authorized to delete this comment");
    }

    #[tokio::test]
    async fn threads_attach_replies_per_comment() {
        let layout_id = LayoutId::random();
        let top = comment(UserId::random(), layout_id, None);
        let reply = comment(UserId::random(), layout_id, Some(top.id));
        let top_id = top.id;
        let mut repo = MockCommentRepository::new();
        repo.expect_list_top_level()
            .return_once(move |_| Ok(vec![top]));
        repo.expect_list_replies()
            .withf(move |parent| *parent == top_id)
            .return_once(move |_| Ok(vec![reply]));

        let threads = CommentService::new(Arc::new(repo))
            .threads(&layout_id)
            .await
            .expect("threads load");

        assert_eq!(threads.len(), 1);
        assert_eq!(threads.first().map(|thread| thread.replies.len()), Some(1));
    }
}
