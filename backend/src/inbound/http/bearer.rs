//! Bearer token extractors.
//!
//! Handlers ask for [`Authenticated`] when a token is mandatory and for
//! [`MaybeAuthenticated`] when a token only enriches the request. Both decode
//! `Authorization: Bearer <token>` through the [`AuthService`] held in
//! [`HttpState`].
//!
//! [`AuthService`]: crate::domain::AuthService

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::error;

use crate::domain::{AuthenticatedUser, Error, NO_TOKEN, TOKEN_FAILED};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, PartialEq, Eq)]
enum Credential<'a> {
    Absent,
    Bearer(&'a str),
}

fn credential(req: &HttpRequest) -> Result<Credential<'_>, Error> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(Credential::Absent);
    };
    let Ok(value) = header.to_str() else {
        return Err(Error::unauthorized(TOKEN_FAILED));
    };
    match value.strip_prefix(BEARER_SCHEME) {
        Some(rest) => Ok(Credential::Bearer(rest.trim())),
        None => Ok(Credential::Absent),
    }
}

fn authenticate(req: &HttpRequest, token: &str) -> Result<AuthenticatedUser, Error> {
    if token.is_empty() {
        return Err(Error::unauthorized(TOKEN_FAILED));
    }
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("HTTP state missing from application data");
        return Err(Error::internal("HTTP state not configured"));
    };
    state.auth.authenticate(token)
}

/// Identity of a caller that presented a valid bearer token.
///
/// Rejects with 401 "Not authorized, no token" when the header is missing and
/// 401 "Not authorized, token failed" when the token does not verify.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedUser);

impl Authenticated {
    pub fn into_inner(self) -> AuthenticatedUser {
        self.0
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = credential(req).and_then(|credential| match credential {
            Credential::Absent => Err(Error::unauthorized(NO_TOKEN)),
            Credential::Bearer(token) => authenticate(req, token).map(Self),
        });
        ready(result)
    }
}

/// Identity of the caller when a bearer token is presented.
///
/// A missing header yields `None`; a token that fails to verify still
/// rejects the request.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<AuthenticatedUser>);

impl MaybeAuthenticated {
    pub fn into_inner(self) -> Option<AuthenticatedUser> {
        self.0
    }
}

impl FromRequest for MaybeAuthenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = credential(req).and_then(|credential| match credential {
            Credential::Absent => Ok(Self(None)),
            Credential::Bearer(token) => authenticate(req, token).map(|user| Self(Some(user))),
        });
        ready(result)
    }
}
