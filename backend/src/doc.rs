//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every annotated handler, the request and response
//! DTOs, and the bearer token security scheme. Swagger UI serves it in debug
//! builds and `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    CustomMaterial, ErrorCode, ObjectGeometry, ObjectMaterial, ObjectProperties, WorkspaceObject,
};
use crate::inbound::http::auth::{
    LoginRequest, ProfileRequest, RegisterRequest, SessionResponse, UserResponse,
};
use crate::inbound::http::comments::{
    CommentResponse, CommentThreadResponse, EditCommentRequest, PostCommentRequest,
};
use crate::inbound::http::custom_objects::{CustomObjectRequest, CustomObjectResponse};
use crate::inbound::http::envelope::MessageEnvelope;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::info::ApiInfo;
use crate::inbound::http::layouts::{ForkRequest, LayoutRequest, LayoutResponse};
use crate::inbound::http::objects::ObjectTemplateResponse;
use crate::inbound::http::templates::{TemplateRequest, TemplateResponse};

/// Name of the bearer scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Register the JWT bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/auth/register or /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "My Setup API",
        version = "1.0.0",
        description = "Save, fork, comment on and template 3D workspace layouts.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::info::root_info,
        crate::inbound::http::info::api_info,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::auth::update_profile,
        crate::inbound::http::layouts::list_layouts,
        crate::inbound::http::layouts::list_public_layouts,
        crate::inbound::http::layouts::get_layout,
        crate::inbound::http::layouts::create_layout,
        crate::inbound::http::layouts::update_layout,
        crate::inbound::http::layouts::delete_layout,
        crate::inbound::http::layouts::fork_layout,
        crate::inbound::http::templates::list_templates,
        crate::inbound::http::templates::get_template,
        crate::inbound::http::templates::create_template,
        crate::inbound::http::templates::update_template,
        crate::inbound::http::templates::delete_template,
        crate::inbound::http::custom_objects::list_custom_objects,
        crate::inbound::http::custom_objects::create_custom_object,
        crate::inbound::http::custom_objects::delete_custom_object,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::post_comment,
        crate::inbound::http::comments::edit_comment,
        crate::inbound::http::comments::toggle_like,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::objects::list_objects,
        crate::inbound::http::objects::seed_objects,
    ),
    components(schemas(
        ErrorEnvelope,
        ErrorCode,
        MessageEnvelope,
        ApiInfo,
        HealthStatus,
        WorkspaceObject,
        ObjectProperties,
        ObjectMaterial,
        ObjectGeometry,
        CustomMaterial,
        LayoutRequest,
        LayoutResponse,
        ForkRequest,
        RegisterRequest,
        LoginRequest,
        ProfileRequest,
        SessionResponse,
        UserResponse,
        TemplateRequest,
        TemplateResponse,
        CustomObjectRequest,
        CustomObjectResponse,
        PostCommentRequest,
        EditCommentRequest,
        CommentResponse,
        CommentThreadResponse,
        ObjectTemplateResponse,
    )),
    tags(
        (name = "info", description = "API discovery"),
        (name = "health", description = "Health checks and probes"),
        (name = "auth", description = "Registration, login and profiles"),
        (name = "layouts", description = "Workspace layouts"),
        (name = "templates", description = "Reusable layout templates"),
        (name = "custom-objects", description = "User-defined objects"),
        (name = "comments", description = "Layout comments and likes"),
        (name = "objects", description = "Object catalogue")
    )
)]
pub struct ApiDoc;
