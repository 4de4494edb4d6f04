//! Domain layer: entities, validation, ports and use-case services.
//!
//! Nothing in here knows about HTTP or SQL. Inbound adapters translate
//! requests into the commands defined here; outbound adapters implement the
//! traits in [`ports`].

pub mod auth;
pub mod auth_service;
pub mod comment;
pub mod comment_service;
pub mod custom_object;
pub mod custom_object_service;
pub mod error;
pub mod ids;
pub mod layout;
pub mod layout_service;
pub mod object_catalogue_service;
pub mod object_template;
pub mod ports;
pub mod template;
pub mod template_service;
pub mod trace_id;
pub mod user;
pub mod validation;
pub mod workspace_object;

pub use self::auth::{
    AuthenticatedUser, CredentialsValidationError, IssuedSession, LoginCredentials, Registration,
    TOKEN_TTL_DAYS, token_ttl,
};
pub use self::auth_service::{AuthService, NO_TOKEN, TOKEN_FAILED};
pub use self::comment::{COMMENT_MAX_CHARS, Comment, CommentThread, LikeToggle, NewComment};
pub use self::comment_service::{CommentService, PostComment};
pub use self::custom_object::{CustomMaterial, CustomObject, NewCustomObject, ObjectGeometry};
pub use self::custom_object_service::CustomObjectService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{CommentId, CustomObjectId, LayoutId, ObjectTemplateId, TemplateId, UserId};
pub use self::layout::{ForkLayout, Layout, LayoutChanges, NewLayout, default_fork_name};
pub use self::layout_service::{LAYOUT_NOT_FOUND, LayoutService};
pub use self::object_catalogue_service::ObjectCatalogueService;
pub use self::object_template::{NewObjectTemplate, ObjectTemplate, default_object_templates};
pub use self::template::{
    ALL_CATEGORIES, NewTemplate, Template, TemplateChanges, TemplateFilter, popularity_order,
};
pub use self::template_service::TemplateService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, ProfileChanges, User, UserAccount};
pub use self::validation::{ValidationCode, ValidationError};
pub use self::workspace_object::{
    DEFAULT_OBJECT_COLOR, ObjectMaterial, ObjectProperties, Vec3, WorkspaceObject,
};
