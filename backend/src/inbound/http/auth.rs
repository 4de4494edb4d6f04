//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/auth/register
//! POST /api/auth/login
//! GET  /api/auth/me
//! PUT  /api/auth/profile
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::validation::{optional_non_empty_string, optional_string};
use crate::domain::{Error, IssuedSession, LoginCredentials, ProfileChanges, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::envelope::{ApiEnvelope, timestamp};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{credentials_error, validation_error};

/// Identity and bearer token returned by register and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub token: String,
}

impl From<IssuedSession> for SessionResponse {
    fn from(value: IssuedSession) -> Self {
        Self {
            id: value.identity.id.to_string(),
            username: value.identity.username,
            email: value.identity.email,
            token: value.token,
        }
    }
}

/// Public profile. The password hash never leaves the domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
            email: value.email,
            bio: value.bio,
            avatar: value.avatar,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProfileRequest {
    #[schema(value_type = Option<String>)]
    pub username: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub bio: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub avatar: Option<Value>,
}

fn parse_profile_changes(body: &ProfileRequest) -> Result<ProfileChanges, Error> {
    Ok(ProfileChanges {
        username: optional_non_empty_string("username", body.username.as_ref())
            .map_err(validation_error)?,
        bio: optional_string("bio", body.bio.as_ref()).map_err(validation_error)?,
        avatar: optional_string("avatar", body.avatar.as_ref()).map_err(validation_error)?,
    })
}

/// Register an account and receive a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiEnvelope<SessionResponse>),
        (status = 400, description = "Missing fields or user already exists", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(username.as_deref(), email.as_deref(), password.as_deref())
            .map_err(credentials_error)?;
    let session = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(ApiEnvelope::data(SessionResponse::from(session))))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiEnvelope<SessionResponse>),
        (status = 400, description = "Missing email or password", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(email.as_deref(), password.as_deref())
        .map_err(credentials_error)?;
    let session = state.auth.login(credentials).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(SessionResponse::from(session))))
}

/// Profile of the token holder.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiEnvelope<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "currentUser",
    security(("BearerToken" = []))
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let user = state.auth.current_user(&caller.0).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::data(UserResponse::from(user))))
}

/// Update username, bio or avatar of the token holder.
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiEnvelope<UserResponse>),
        (status = 400, description = "Invalid payload or username taken", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "updateProfile",
    security(("BearerToken" = []))
)]
#[put("/auth/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<HttpResponse> {
    let changes = parse_profile_changes(&payload)?;
    let user = state.auth.update_profile(&caller.0, changes).await?;
    Ok(HttpResponse::Ok().json(ApiEnvelope::with_message(
        UserResponse::from(user),
        "Profile updated successfully",
    )))
}
