//! Layout comments with one level of threading.

use chrono::{DateTime, Utc};

use crate::domain::{CommentId, LayoutId, UserId};

/// Upper bound on trimmed comment length, in characters.
pub const COMMENT_MAX_CHARS: usize = 1000;

/// A comment on a layout, or a reply to a top-level comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    /// Not checked against the layout store.
    pub layout_id: LayoutId,
    pub author: UserId,
    /// Author's username captured when the comment was written.
    pub username: String,
    pub content: String,
    pub parent: Option<CommentId>,
    /// Maintained by [`Comment::toggle_like`], never recomputed from `liked_by`.
    pub likes: u32,
    pub liked_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of [`Comment::toggle_like`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl Comment {
    /// Materialise a new comment from a validated command.
    pub fn create(id: CommentId, new_comment: NewComment, now: DateTime<Utc>) -> Self {
        Self {
            id,
            layout_id: new_comment.layout_id,
            author: new_comment.author,
            username: new_comment.username,
            content: new_comment.content,
            parent: new_comment.parent,
            likes: 0,
            liked_by: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this comment is a top-level comment.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Like the comment for `user`, or remove their like if present.
    ///
    /// `liked_by` never holds duplicates and `likes` never drops below zero.
    pub fn toggle_like(&mut self, user: UserId, now: DateTime<Utc>) -> LikeToggle {
        let outcome = if let Some(position) = self.liked_by.iter().position(|id| *id == user) {
            self.liked_by.remove(position);
            self.likes = self.likes.saturating_sub(1);
            LikeToggle::Unliked
        } else {
            self.liked_by.push(user);
            self.likes = self.likes.saturating_add(1);
            LikeToggle::Liked
        };
        self.updated_at = now;
        outcome
    }
}

/// Validated input for a new comment or reply.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub layout_id: LayoutId,
    pub author: UserId,
    pub username: String,
    pub content: String,
    pub parent: Option<CommentId>,
}

/// A top-level comment with its direct replies, oldest reply first.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}
