//! Comment HTTP handlers.
//!
//! ```text
//! GET    /api/comments/{layoutId}
//! POST   /api/comments
//! PUT    /api/comments/{id}
//! PUT    /api/comments/{id}/like
//! DELETE /api/comments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::validation::require_content;
use crate::domain::{
    COMMENT_MAX_CHARS, Comment, CommentId, CommentThread, Error, LayoutId, PostComment,
    ValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::envelope::{ApiEnvelope, MessageEnvelope, timestamp};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_body_id, parse_path_id, validation_error};

const COMMENT_NOT_FOUND: &str = "Comment not found";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub layout_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub likes: u32,
    pub liked_by: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id.to_string(),
            layout_id: value.layout_id.to_string(),
            user_id: value.author.to_string(),
            username: value.username,
            content: value.content,
            parent_id: value.parent.map(|parent| parent.to_string()),
            likes: value.likes,
            liked_by: value.liked_by.iter().map(ToString::to_string).collect(),
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

/// A top-level comment with its replies, oldest reply first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentThreadResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentResponse>,
}

impl From<CommentThread> for CommentThreadResponse {
    fn from(value: CommentThread) -> Self {
        Self {
            comment: CommentResponse::from(value.comment),
            replies: value.replies.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostCommentRequest {
    #[schema(value_type = Option<String>)]
    pub layout_id: Option<Value>,
    #[schema(value_type = Option<String>, example = "Love the monitor arm!")]
    pub content: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub parent_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EditCommentRequest {
    #[schema(value_type = Option<String>)]
    pub content: Option<Value>,
}

fn parse_post(body: &PostCommentRequest) -> Result<PostComment, Error> {
    let layout_id: LayoutId = parse_body_id("layoutId", body.layout_id.as_ref())?
        .ok_or_else(|| validation_error(ValidationError::Missing { field: "layoutId" }))?;
    let content = require_content("content", body.content.as_ref(), COMMENT_MAX_CHARS)
        .map_err(validation_error)?;
    Ok(PostComment {
        layout_id,
        content,
        parent: parse_body_id("parentId", body.parent_id.as_ref())?,
    })
}

fn comment_id(raw: &str) -> Result<CommentId, Error> {
    parse_path_id(raw, COMMENT_NOT_FOUND)
}

/// Threads for a layout, newest thread first.
#[utoipa::path(
    get,
    path = "/api/comments/{layoutId}",
    params(("layoutId" = String, Path, description = "Layout identifier")),
    responses(
        (status = 200, description = "Comment threads", body = ApiEnvelope<Vec<CommentThreadResponse>>)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/comments/{layout_id}")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    // Comments can only reference real layouts; a malformed id has none.
    let Ok(layout_id) = path.parse::<LayoutId>() else {
        return Ok(HttpResponse::Ok().json(ApiEnvelope::data(Vec::<CommentThreadResponse>::new())));
    };
    let threads = state.comments.threads(&layout_id).await?;
    let data: Vec<CommentThreadResponse> =
        threads.into_iter().map(CommentThreadResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(data)))
}

#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = PostCommentRequest,
    responses(
        (status = 201, description = "Comment posted", body = ApiEnvelope<CommentResponse>),
        (status = 400, description = "Invalid payload", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Parent comment not found", body = ErrorEnvelope)
    ),
    tags = ["comments"],
    operation_id = "postComment",
    security(("BearerToken" = []))
)]
#[post("/comments")]
pub async fn post_comment(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<PostCommentRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_post(&payload)?;
    let comment = state.comments.post(&caller.0, request).await?;
    Ok(HttpResponse::Created().json(ApiEnvelope::with_message(
        CommentResponse::from(comment),
        "Comment created successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    request_body = EditCommentRequest,
    responses(
        (status = 200, description = "Comment edited", body = ApiEnvelope<CommentResponse>),
        (status = 400, description = "Invalid payload", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Not the author", body = ErrorEnvelope),
        (status = 404, description = "Comment not found", body = ErrorEnvelope)
    ),
    tags = ["comments"],
    operation_id = "editComment",
    security(("BearerToken" = []))
)]
#[put("/comments/{id}")]
pub async fn edit_comment(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<EditCommentRequest>,
) -> ApiResult<HttpResponse> {
    let id = comment_id(&path)?;
    let content = require_content("content", payload.content.as_ref(), COMMENT_MAX_CHARS)
        .map_err(validation_error)?;
    let comment = state.comments.edit(&caller.0, &id, content).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::with_message(
        CommentResponse::from(comment),
        "Comment updated successfully",
    )))
}

/// Like the comment, or take the like back if the caller already gave one.
#[utoipa::path(
    put,
    path = "/api/comments/{id}/like",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Like toggled", body = ApiEnvelope<CommentResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Comment not found", body = ErrorEnvelope)
    ),
    tags = ["comments"],
    operation_id = "toggleCommentLike",
    security(("BearerToken" = []))
)]
#[put("/comments/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = comment_id(&path)?;
    let comment = state.comments.toggle_like(&caller.0, &id).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(CommentResponse::from(comment))))
}

/// Delete a comment; deleting a top-level comment removes its replies.
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Not the author", body = ErrorEnvelope),
        (status = 404, description = "Comment not found", body = ErrorEnvelope)
    ),
    tags = ["comments"],
    operation_id = "deleteComment",
    security(("BearerToken" = []))
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = comment_id(&path)?;
    state.comments.delete(&caller.0, &id).await?;
    Ok(HttpResponse::Ok().json(MessageEnvelope::new("Comment deleted successfully")))
}
