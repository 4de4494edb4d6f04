//! Object catalogue HTTP handlers.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ObjectMaterial, ObjectTemplate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::envelope::{ApiEnvelope, timestamp};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTemplateResponse {
    pub id: String,
    #[serde(rename = "type")]
    #[schema(example = "desk")]
    pub kind: String,
    #[schema(example = "Standing Desk")]
    pub name: String,
    #[schema(example = "furniture")]
    pub category: String,
    #[schema(value_type = Vec<f64>)]
    pub scale: [f64; 3],
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<ObjectMaterial>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ObjectTemplate> for ObjectTemplateResponse {
    fn from(value: ObjectTemplate) -> Self {
        Self {
            id: value.id.to_string(),
            kind: value.kind,
            name: value.name,
            category: value.category,
            scale: value.scale,
            color: value.color,
            dimensions: value.dimensions,
            material: value.material,
            price: value.price,
            thumbnail_url: value.thumbnail_url,
            model_url: value.model_url,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ObjectListQuery {
    /// Only entries in this category.
    pub category: Option<String>,
}

fn render(entries: Vec<ObjectTemplate>) -> Vec<ObjectTemplateResponse> {
    entries.into_iter().map(ObjectTemplateResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/objects",
    params(ObjectListQuery),
    responses(
        (status = 200, description = "Catalogue entries", body = ApiEnvelope<Vec<ObjectTemplateResponse>>)
    ),
    tags = ["objects"],
    operation_id = "listObjects"
)]
#[get("/objects")]
pub async fn list_objects(
    state: web::Data<HttpState>,
    query: web::Query<ObjectListQuery>,
) -> ApiResult<HttpResponse> {
    let entries = state.objects.list(query.into_inner().category).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(render(entries))))
}

/// Insert the built-in catalogue entries that are missing.
#[utoipa::path(
    post,
    path = "/api/objects/seed",
    responses(
        (status = 200, description = "Catalogue after seeding", body = ApiEnvelope<Vec<ObjectTemplateResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["objects"],
    operation_id = "seedObjects",
    security(("BearerToken" = []))
)]
#[post("/objects/seed")]
pub async fn seed_objects(
    state: web::Data<HttpState>,
    _caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let entries = state.objects.seed_defaults().await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::with_message(
        render(entries),
        "Objects seeded successfully",
    )))
}
