//! Route table for the REST API.
//!
//! Fixed segments such as `/layouts/public` are registered ahead of their
//! `{id}` siblings so they are matched first.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::{
    auth, comments, custom_objects, health, info, layouts, objects, templates,
};

const ROUTE_NOT_FOUND: &str = "Route not found";

fn malformed_input(kind: &str, cause: String) -> actix_web::Error {
    debug!(%cause, "rejected malformed {kind}");
    Error::invalid_request(format!("Malformed {kind}"))
        .with_details(json!({ "cause": cause }))
        .into()
}

/// JSON body extractor settings: malformed bodies become 400 envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            malformed_input("JSON body", err.to_string())
        })
}

/// Query string extractor settings: malformed queries become 400 envelopes.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
            malformed_input("query string", err.to_string())
        })
}

/// Register discovery documents, health endpoints and the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(info::root_info)
        .service(info::api_info)
        .service(health::health)
        .service(health::ready)
        .service(health::live)
        .service(api_scope());
}

fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(auth::register)
        .service(auth::login)
        .service(auth::current_user)
        .service(auth::update_profile)
        .service(layouts::list_layouts)
        .service(layouts::list_public_layouts)
        .service(layouts::get_layout)
        .service(layouts::create_layout)
        .service(layouts::update_layout)
        .service(layouts::delete_layout)
        .service(layouts::fork_layout)
        .service(templates::list_templates)
        .service(templates::get_template)
        .service(templates::create_template)
        .service(templates::update_template)
        .service(templates::delete_template)
        .service(custom_objects::list_custom_objects)
        .service(custom_objects::create_custom_object)
        .service(custom_objects::delete_custom_object)
        .service(comments::list_comments)
        .service(comments::post_comment)
        .service(comments::toggle_like)
        .service(comments::edit_comment)
        .service(comments::delete_comment)
        .service(objects::list_objects)
        .service(objects::seed_objects)
}

/// Fallback for every unmatched request.
pub async fn route_not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found(ROUTE_NOT_FOUND))
}
