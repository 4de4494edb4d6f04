//! Layout HTTP handlers.
//!
//! ```text
//! GET    /api/layouts?userId=
//! GET    /api/layouts/public
//! GET    /api/layouts/{id}
//! POST   /api/layouts
//! PUT    /api/layouts/{id}
//! DELETE /api/layouts/{id}
//! POST   /api/layouts/{id}/fork
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::validation::{
    optional_bool, optional_non_empty_string, optional_workspace_objects,
    require_non_empty_string, require_workspace_objects,
};
use crate::domain::{
    AuthenticatedUser, Error, ForkLayout, LAYOUT_NOT_FOUND, Layout, LayoutChanges, LayoutId, NewLayout,
    WorkspaceObject,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::{Authenticated, MaybeAuthenticated};
use crate::inbound::http::envelope::{ApiEnvelope, MessageEnvelope, timestamp};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    claimed_owner, parse_owner_filter, parse_path_id, validation_error,
};

/// Layout as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Desk Setup")]
    pub name: String,
    pub objects: Vec<WorkspaceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forked_from: Option<String>,
    pub fork_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Layout> for LayoutResponse {
    fn from(value: Layout) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            objects: value.objects,
            user_id: value.owner.map(|owner| owner.to_string()),
            is_public: value.is_public,
            forked_from: value.forked_from.map(|source| source.to_string()),
            fork_count: value.fork_count,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

fn responses(layouts: Vec<Layout>) -> Vec<LayoutResponse> {
    layouts.into_iter().map(LayoutResponse::from).collect()
}

/// Create or update payload. Fields stay loosely typed so shape failures
/// can name the offending field.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    #[schema(value_type = Option<String>, example = "Desk Setup")]
    pub name: Option<Value>,
    #[schema(value_type = Option<Vec<WorkspaceObject>>)]
    pub objects: Option<Value>,
    #[schema(value_type = Option<bool>)]
    pub is_public: Option<Value>,
    /// Owner used when the request carries no bearer token.
    #[schema(value_type = Option<String>)]
    pub user_id: Option<Value>,
}

/// Fork payload.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForkRequest {
    /// Name of the copy; defaults to "<source name> (Fork)".
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LayoutListQuery {
    /// Only return layouts owned by this user.
    pub user_id: Option<String>,
}

fn parse_new_layout(
    body: &LayoutRequest,
    caller: Option<&AuthenticatedUser>,
) -> Result<NewLayout, Error> {
    let name = require_non_empty_string("name", body.name.as_ref()).map_err(validation_error)?;
    let objects =
        require_workspace_objects("objects", body.objects.as_ref()).map_err(validation_error)?;
    let is_public = optional_bool("isPublic", body.is_public.as_ref()).map_err(validation_error)?;
    let owner = match caller {
        Some(caller) => Some(caller.id),
        None => claimed_owner(body.user_id.as_ref()),
    };
    Ok(NewLayout {
        name,
        objects,
        owner,
        is_public,
    })
}

fn parse_layout_changes(body: &LayoutRequest) -> Result<LayoutChanges, Error> {
    Ok(LayoutChanges {
        name: optional_non_empty_string("name", body.name.as_ref()).map_err(validation_error)?,
        objects: optional_workspace_objects("objects", body.objects.as_ref())
            .map_err(validation_error)?,
        is_public: optional_bool("isPublic", body.is_public.as_ref()).map_err(validation_error)?,
    })
}

fn layout_id(raw: &str) -> Result<LayoutId, Error> {
    parse_path_id(raw, LAYOUT_NOT_FOUND)
}

/// List layouts, optionally filtered by owner.
#[utoipa::path(
    get,
    path = "/api/layouts",
    params(LayoutListQuery),
    responses(
        (status = 200, description = "Layouts in creation order", body = ApiEnvelope<Vec<LayoutResponse>>),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["layouts"],
    operation_id = "listLayouts"
)]
#[get("/layouts")]
pub async fn list_layouts(
    state: web::Data<HttpState>,
    query: web::Query<LayoutListQuery>,
) -> ApiResult<HttpResponse> {
    let layouts = match parse_owner_filter(query.user_id.as_deref()) {
        Ok(owner) => state.layouts.list(owner).await?,
        Err(()) => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(ApiEnvelope::with_message(
        responses(layouts),
        "Layouts retrieved successfully",
    )))
}

/// List public layouts, newest first.
#[utoipa::path(
    get,
    path = "/api/layouts/public",
    responses(
        (status = 200, description = "Public layouts", body = ApiEnvelope<Vec<LayoutResponse>>),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["layouts"],
    operation_id = "listPublicLayouts"
)]
#[get("/layouts/public")]
pub async fn list_public_layouts(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let layouts = state.layouts.list_public().await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(responses(layouts))))
}

/// Fetch one layout.
#[utoipa::path(
    get,
    path = "/api/layouts/{id}",
    params(("id" = String, Path, description = "Layout identifier")),
    responses(
        (status = 200, description = "Layout", body = ApiEnvelope<LayoutResponse>),
        (status = 404, description = "Layout not found", body = ErrorEnvelope)
    ),
    tags = ["layouts"],
    operation_id = "getLayout"
)]
#[get("/layouts/{id}")]
pub async fn get_layout(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = layout_id(&path)?;
    let layout = state.layouts.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(LayoutResponse::from(layout))))
}

/// Create a layout. The bearer identity, when present, becomes the owner.
#[utoipa::path(
    post,
    path = "/api/layouts",
    request_body = LayoutRequest,
    responses(
        (status = 201, description = "Layout created", body = ApiEnvelope<LayoutResponse>),
        (status = 400, description = "Invalid payload", body = ErrorEnvelope),
        (status = 401, description = "Token failed verification", body = ErrorEnvelope)
    ),
    tags = ["layouts"],
    operation_id = "createLayout"
)]
#[post("/layouts")]
pub async fn create_layout(
    state: web::Data<HttpState>,
    caller: MaybeAuthenticated,
    payload: web::Json<LayoutRequest>,
) -> ApiResult<HttpResponse> {
    let caller = caller.into_inner();
    let new_layout = parse_new_layout(&payload, caller.as_ref())?;
    let layout = state.layouts.create(new_layout).await?;
    Ok(HttpResponse::Created().json(ApiEnvelope::with_message(
        LayoutResponse::from(layout),
        "Layout created successfully",
    )))
}

/// Merge the provided fields into a layout.
#[utoipa::path(
    put,
    path = "/api/layouts/{id}",
    params(("id" = String, Path, description = "Layout identifier")),
    request_body = LayoutRequest,
    responses(
        (status = 200, description = "Layout updated", body = ApiEnvelope<LayoutResponse>),
        (status = 400, description = "Invalid payload", body = ErrorEnvelope),
        (status = 404, description = "Layout not found", body = ErrorEnvelope)
    ),
    tags = ["layouts"],
    operation_id = "updateLayout"
)]
#[put("/layouts/{id}")]
pub async fn update_layout(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<LayoutRequest>,
) -> ApiResult<HttpResponse> {
    let id = layout_id(&path)?;
    state.layouts.ensure_exists(&id).await?;
    let changes = parse_layout_changes(&payload)?;
    let layout = state.layouts.update(&id, changes).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::with_message(
        LayoutResponse::from(layout),
        "Layout updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/layouts/{id}",
    params(("id" = String, Path, description = "Layout identifier")),
    responses(
        (status = 200, description = "Layout deleted", body = MessageEnvelope),
        (status = 404, description = "Layout not found", body = ErrorEnvelope)
    ),
    tags = ["layouts"],
    operation_id = "deleteLayout"
)]
#[delete("/layouts/{id}")]
pub async fn delete_layout(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = layout_id(&path)?;
    state.layouts.delete(&id).await?;
    Ok(HttpResponse::Ok().json(MessageEnvelope::new("Layout deleted successfully")))
}

/// The fork body is optional: an empty body selects the default name, but
/// anything else must be a well-formed [`ForkRequest`].
fn parse_fork_request(body: &[u8]) -> Result<ForkRequest, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ForkRequest::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        debug!(cause = %err, "rejected malformed fork body");
        Error::invalid_request("Malformed JSON body").with_details(json!({ "cause": err.to_string() }))
    })
}

/// Copy a layout into the caller's collection.
#[utoipa::path(
    post,
    path = "/api/layouts/{id}/fork",
    params(("id" = String, Path, description = "Source layout identifier")),
    request_body(content = ForkRequest, description = "Optional name of the copy; the body may be empty"),
    responses(
        (status = 201, description = "Layout forked", body = ApiEnvelope<LayoutResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Layout not found", body = ErrorEnvelope)
    ),
    tags = ["layouts"],
    operation_id = "forkLayout",
    security(("BearerToken" = []))
)]
#[post("/layouts/{id}/fork")]
pub async fn fork_layout(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let source = layout_id(&path)?;
    let payload = parse_fork_request(&body)?;
    let name = optional_non_empty_string("name", payload.name.as_ref()).map_err(validation_error)?;
    let layout = state
        .layouts
        .fork(ForkLayout {
            source,
            owner: Some(caller.into_inner().id),
            name,
        })
        .await?;
    Ok(HttpResponse::Created().json(ApiEnvelope::with_message(
        LayoutResponse::from(layout),
        "Layout forked successfully",
    )))
}
