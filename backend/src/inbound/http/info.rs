//! API discovery documents served at `/` and `/api`.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const API_NAME: &str = "My Setup API";
pub const API_VERSION: &str = "1.0.0";

const RESOURCE_ENDPOINTS: [(&str, &str); 6] = [
    ("auth", "/api/auth"),
    ("layouts", "/api/layouts"),
    ("templates", "/api/templates"),
    ("customObjects", "/api/custom-objects"),
    ("comments", "/api/comments"),
    ("objects", "/api/objects"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiInfo {
    #[schema(example = "My Setup API")]
    pub message: String,
    #[schema(example = "1.0.0")]
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

impl ApiInfo {
    fn with_endpoints<'a>(endpoints: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            message: API_NAME.to_owned(),
            version: API_VERSION.to_owned(),
            endpoints: endpoints
                .into_iter()
                .map(|(name, path)| (name.to_owned(), path.to_owned()))
                .collect(),
        }
    }

    /// Entry points only.
    pub fn root() -> Self {
        Self::with_endpoints([("health", "/health"), ("api", "/api")])
    }

    /// Entry points plus every resource collection.
    pub fn api() -> Self {
        Self::with_endpoints(
            [("health", "/health"), ("api", "/api")]
                .into_iter()
                .chain(RESOURCE_ENDPOINTS),
        )
    }
}

#[utoipa::path(
    get,
    path = "/",
    tags = ["info"],
    security([]),
    responses((status = 200, description = "API name and entry points", body = ApiInfo))
)]
#[get("/")]
pub async fn root_info() -> HttpResponse {
    HttpResponse::Ok().json(ApiInfo::root())
}

#[utoipa::path(
    get,
    path = "/api",
    tags = ["info"],
    security([]),
    responses((status = 200, description = "API name and resource collections", body = ApiInfo))
)]
#[get("/api")]
pub async fn api_info() -> HttpResponse {
    HttpResponse::Ok().json(ApiInfo::api())
}
