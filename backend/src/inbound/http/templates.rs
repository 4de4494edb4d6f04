//! Layout template HTTP handlers.
//!
//! ```text
//! GET    /api/templates?category=&userId=
//! GET    /api/templates/{id}
//! POST   /api/templates
//! PUT    /api/templates/{id}
//! DELETE /api/templates/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::validation::{
    optional_bool, optional_non_empty_string, optional_string, optional_workspace_objects,
    require_non_empty_string,
};
use crate::domain::{
    Error, NewTemplate, Template, TemplateChanges, TemplateFilter, TemplateId,
    WorkspaceObject,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::envelope::{ApiEnvelope, MessageEnvelope, timestamp};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_owner_filter, parse_path_id, validation_error};

const TEMPLATE_NOT_FOUND: &str = "Template not found";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: String,
    #[schema(example = "Minimal Desk")]
    pub name: String,
    pub description: String,
    #[schema(example = "Minimal")]
    pub category: String,
    pub objects: Vec<WorkspaceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub usage_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Template> for TemplateResponse {
    fn from(value: Template) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            category: value.category,
            objects: value.objects,
            thumbnail_url: value.thumbnail_url,
            is_public: value.is_public,
            user_id: value.owner.map(|owner| owner.to_string()),
            usage_count: value.usage_count,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub category: Option<Value>,
    #[schema(value_type = Option<Vec<WorkspaceObject>>)]
    pub objects: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub thumbnail_url: Option<Value>,
    #[schema(value_type = Option<bool>)]
    pub is_public: Option<Value>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TemplateListQuery {
    /// Category to match; `All` or empty lists every category.
    pub category: Option<String>,
    /// Include this user's private templates.
    pub user_id: Option<String>,
}

fn parse_new_template(body: &TemplateRequest) -> Result<NewTemplate, Error> {
    let name = require_non_empty_string("name", body.name.as_ref()).map_err(validation_error)?;
    let category =
        require_non_empty_string("category", body.category.as_ref()).map_err(validation_error)?;
    let objects = optional_workspace_objects("objects", body.objects.as_ref())
        .map_err(validation_error)?
        .unwrap_or_default();
    Ok(NewTemplate {
        name,
        description: optional_string("description", body.description.as_ref())
            .map_err(validation_error)?,
        category,
        objects,
        thumbnail_url: optional_string("thumbnailUrl", body.thumbnail_url.as_ref())
            .map_err(validation_error)?,
        is_public: optional_bool("isPublic", body.is_public.as_ref()).map_err(validation_error)?,
        owner: None,
    })
}

fn parse_template_changes(body: &TemplateRequest) -> Result<TemplateChanges, Error> {
    Ok(TemplateChanges {
        name: optional_non_empty_string("name", body.name.as_ref()).map_err(validation_error)?,
        description: optional_string("description", body.description.as_ref())
            .map_err(validation_error)?,
        category: optional_non_empty_string("category", body.category.as_ref())
            .map_err(validation_error)?,
        objects: optional_workspace_objects("objects", body.objects.as_ref())
            .map_err(validation_error)?,
        thumbnail_url: optional_string("thumbnailUrl", body.thumbnail_url.as_ref())
            .map_err(validation_error)?,
        is_public: optional_bool("isPublic", body.is_public.as_ref()).map_err(validation_error)?,
    })
}

fn template_id(raw: &str) -> Result<TemplateId, Error> {
    parse_path_id(raw, TEMPLATE_NOT_FOUND)
}

/// Public templates (plus the viewer's own), most used first.
#[utoipa::path(
    get,
    path = "/api/templates",
    params(TemplateListQuery),
    responses(
        (status = 200, description = "Templates", body = ApiEnvelope<Vec<TemplateResponse>>)
    ),
    tags = ["templates"],
    operation_id = "listTemplates"
)]
#[get("/templates")]
pub async fn list_templates(
    state: web::Data<HttpState>,
    query: web::Query<TemplateListQuery>,
) -> ApiResult<HttpResponse> {
    let TemplateListQuery { category, user_id } = query.into_inner();
    let viewer = parse_owner_filter(user_id.as_deref()).unwrap_or_default();
    let templates = state
        .templates
        .list(TemplateFilter::new(category, viewer))
        .await?;
    let data: Vec<TemplateResponse> = templates.into_iter().map(TemplateResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(data)))
}

/// Fetch a template; every read counts as a use.
#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    params(("id" = String, Path, description = "Template identifier")),
    responses(
        (status = 200, description = "Template", body = ApiEnvelope<TemplateResponse>),
        (status = 404, description = "Template not found", body = ErrorEnvelope)
    ),
    tags = ["templates"],
    operation_id = "getTemplate"
)]
#[get("/templates/{id}")]
pub async fn get_template(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = template_id(&path)?;
    let template = state.templates.open(&id).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(TemplateResponse::from(template))))
}

#[utoipa::path(
    post,
    path = "/api/templates",
    request_body = TemplateRequest,
    responses(
        (status = 201, description = "Template created", body = ApiEnvelope<TemplateResponse>),
        (status = 400, description = "Invalid payload", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["templates"],
    operation_id = "createTemplate",
    security(("BearerToken" = []))
)]
#[post("/templates")]
pub async fn create_template(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<TemplateRequest>,
) -> ApiResult<HttpResponse> {
    let new_template = parse_new_template(&payload)?;
    let template = state.templates.create(&caller.0, new_template).await?;
    Ok(HttpResponse::Created().json(ApiEnvelope::with_message(
        TemplateResponse::from(template),
        "Template created successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/templates/{id}",
    params(("id" = String, Path, description = "Template identifier")),
    request_body = TemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = ApiEnvelope<TemplateResponse>),
        (status = 400, description = "Invalid payload", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Not the owner", body = ErrorEnvelope),
        (status = 404, description = "Template not found", body = ErrorEnvelope)
    ),
    tags = ["templates"],
    operation_id = "updateTemplate",
    security(("BearerToken" = []))
)]
#[put("/templates/{id}")]
pub async fn update_template(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<TemplateRequest>,
) -> ApiResult<HttpResponse> {
    let id = template_id(&path)?;
    let changes = parse_template_changes(&payload)?;
    let template = state
        .templates
        .update(&caller.0, &id, changes)
        .await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::with_message(
        TemplateResponse::from(template),
        "Template updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/templates/{id}",
    params(("id" = String, Path, description = "Template identifier")),
    responses(
        (status = 200, description = "Template deleted", body = MessageEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Not the owner", body = ErrorEnvelope),
        (status = 404, description = "Template not found", body = ErrorEnvelope)
    ),
    tags = ["templates"],
    operation_id = "deleteTemplate",
    security(("BearerToken" = []))
)]
#[delete("/templates/{id}")]
pub async fn delete_template(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = template_id(&path)?;
    state.templates.delete(&caller.0, &id).await?;
    Ok(HttpResponse::Ok().json(MessageEnvelope::new("Template deleted successfully")))
}
