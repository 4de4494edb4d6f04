//! Custom object HTTP handlers.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::validation::{
    optional_bool, optional_string, require_non_empty_string, require_vec3,
};
use crate::domain::{
    CustomMaterial, CustomObject, CustomObjectId, Error, NewCustomObject, ObjectGeometry,
    UserId, ValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::envelope::{ApiEnvelope, MessageEnvelope, timestamp};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_owner_filter, parse_path_id, validation_error};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomObjectResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: ObjectGeometry,
    pub material: CustomMaterial,
    #[schema(value_type = Vec<f64>)]
    pub scale: [f64; 3],
    pub user_id: String,
    pub is_public: bool,
    pub usage_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CustomObject> for CustomObjectResponse {
    fn from(value: CustomObject) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            kind: value.kind,
            geometry: value.geometry,
            material: value.material,
            scale: value.scale,
            user_id: value.owner.to_string(),
            is_public: value.is_public,
            usage_count: value.usage_count,
            model_url: value.model_url,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomObjectRequest {
    #[schema(value_type = Option<String>, example = "Floating shelf")]
    pub name: Option<Value>,
    #[serde(rename = "type")]
    #[schema(value_type = Option<String>, example = "box")]
    pub kind: Option<Value>,
    #[schema(value_type = Option<ObjectGeometry>)]
    pub geometry: Option<Value>,
    #[schema(value_type = Option<CustomMaterial>)]
    pub material: Option<Value>,
    #[schema(value_type = Option<Vec<f64>>)]
    pub scale: Option<Value>,
    #[schema(value_type = Option<bool>)]
    pub is_public: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub model_url: Option<Value>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CustomObjectListQuery {
    /// Include this user's private objects.
    pub user_id: Option<String>,
}

fn typed<T: serde::de::DeserializeOwned>(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<T>, ValidationError> {
    value
        .filter(|value| !value.is_null())
        .map(|value| {
            serde_json::from_value(value.clone()).map_err(|err| ValidationError::Malformed {
                field,
                reason: err.to_string(),
            })
        })
        .transpose()
}

fn parse_new_object(body: &CustomObjectRequest, owner: UserId) -> Result<NewCustomObject, Error> {
    let name = require_non_empty_string("name", body.name.as_ref()).map_err(validation_error)?;
    let kind = require_non_empty_string("type", body.kind.as_ref()).map_err(validation_error)?;
    let geometry = typed::<ObjectGeometry>("geometry", body.geometry.as_ref())
        .and_then(|geometry| geometry.ok_or(ValidationError::Missing { field: "geometry" }))
        .map_err(validation_error)?;
    let scale = require_vec3("scale", body.scale.as_ref()).map_err(validation_error)?;
    Ok(NewCustomObject {
        name,
        kind,
        geometry,
        material: typed("material", body.material.as_ref()).map_err(validation_error)?,
        scale,
        owner,
        is_public: optional_bool("isPublic", body.is_public.as_ref()).map_err(validation_error)?,
        model_url: optional_string("modelUrl", body.model_url.as_ref())
            .map_err(validation_error)?,
    })
}

/// Public objects plus the viewer's own, most used first.
#[utoipa::path(
    get,
    path = "/api/custom-objects",
    params(CustomObjectListQuery),
    responses(
        (status = 200, description = "Custom objects", body = ApiEnvelope<Vec<CustomObjectResponse>>)
    ),
    tags = ["custom-objects"],
    operation_id = "listCustomObjects"
)]
#[get("/custom-objects")]
pub async fn list_custom_objects(
    state: web::Data<HttpState>,
    query: web::Query<CustomObjectListQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = parse_owner_filter(query.user_id.as_deref()).unwrap_or_default();
    let objects = state.custom_objects.list(viewer).await?;
    let data: Vec<CustomObjectResponse> =
        objects.into_iter().map(CustomObjectResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(data)))
}

#[utoipa::path(
    post,
    path = "/api/custom-objects",
    request_body = CustomObjectRequest,
    responses(
        (status = 201, description = "Custom object created", body = ApiEnvelope<CustomObjectResponse>),
        (status = 400, description = "Invalid payload", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["custom-objects"],
    operation_id = "createCustomObject",
    security(("BearerToken" = []))
)]
#[post("/custom-objects")]
pub async fn create_custom_object(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CustomObjectRequest>,
) -> ApiResult<HttpResponse> {
    let new_object = parse_new_object(&payload, caller.0.id)?;
    let object = state.custom_objects.create(&caller.0, new_object).await?;
    Ok(HttpResponse::Created().json(ApiEnvelope::with_message(
        CustomObjectResponse::from(object),
        "Custom object created successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/custom-objects/{id}",
    params(("id" = String, Path, description = "Custom object identifier")),
    responses(
        (status = 200, description = "Custom object deleted", body = MessageEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Not the owner", body = ErrorEnvelope),
        (status = 404, description = "Custom object not found", body = ErrorEnvelope)
    ),
    tags = ["custom-objects"],
    operation_id = "deleteCustomObject",
    security(("BearerToken" = []))
)]
#[delete("/custom-objects/{id}")]
pub async fn delete_custom_object(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CustomObjectId = parse_path_id(&path, "Custom object not found")?;
    state.custom_objects.delete(&caller.0, &id).await?;
    Ok(HttpResponse::Ok().json(MessageEnvelope::new("Custom object deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn request(body: Value) -> CustomObjectRequest {
        serde_json::from_value(body).expect("request deserialises")
    }

    #[rstest]
    #[case(json!({"type": "box", "geometry": {"type": "box"}, "scale": [1, 1, 1]}), "name")]
    #[case(json!({"name": "Shelf", "geometry": {"type": "box"}, "scale": [1, 1, 1]}), "type")]
    #[case(json!({"name": "Shelf", "type": "box", "scale": [1, 1, 1]}), "geometry")]
    #[case(json!({"name": "Shelf", "type": "box", "geometry": {"type": "box"}}), "scale")]
    #[case(json!({"name": "Shelf", "type": "box", "geometry": {"args": []}, "scale": [1, 1, 1]}), "geometry")]
    fn incomplete_objects_name_the_field(#[case] body: Value, #[case] field: &str) {
        let err = parse_new_object(&request(body), UserId::random()).expect_err("incomplete object");
        assert_eq!(
            err.details().and_then(|details| details.get("field")),
            Some(&json!(field))
        );
    }

    #[test]
    fn partial_material_is_completed_with_defaults() {
        let object = parse_new_object(&request(json!({
            "name": "Shelf",
            "type": "box",
            "geometry": {"type": "box", "args": [1, 0.1, 0.3]},
            "material": {"color": "#333333"},
            "scale": [1, 1, 1],
        })), UserId::random())
        .expect("valid object");

        let material = object.material.expect("material provided");
        assert_eq!(material.color, "#333333");
        assert!((material.roughness - 0.5).abs() < f64::EPSILON);
    }
}
