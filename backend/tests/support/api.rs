//! In-process HTTP harness driving the full route table over in-memory stores.

use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use layout_backend::Trace;
use layout_backend::domain::TRACE_ID_HEADER;
use layout_backend::inbound::http::health::HealthState;
use layout_backend::inbound::http::routes::{configure, route_not_found};
use layout_backend::inbound::http::state::HttpState;
use layout_backend::test_support::in_memory_state;
use serde_json::{Value, json};

pub(crate) struct JsonRequest<'a> {
    pub(crate) method: Method,
    pub(crate) path: &'a str,
    pub(crate) payload: Option<Value>,
    pub(crate) token: Option<&'a str>,
}

impl<'a> JsonRequest<'a> {
    pub(crate) fn get(path: &'a str) -> Self {
        Self {
            method: Method::GET,
            path,
            payload: None,
            token: None,
        }
    }

    pub(crate) fn with_method(method: Method, path: &'a str, payload: Value) -> Self {
        Self {
            method,
            path,
            payload: Some(payload),
            token: None,
        }
    }

    pub(crate) fn bearer(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }
}

pub(crate) struct CapturedResponse {
    pub(crate) status: StatusCode,
    pub(crate) trace_id: Option<String>,
    pub(crate) body: Value,
}

/// Shared application state; every call runs against the same stores.
pub(crate) struct Api {
    state: web::Data<HttpState>,
}

impl Api {
    pub(crate) fn new() -> Self {
        Self {
            state: web::Data::new(in_memory_state()),
        }
    }

    pub(crate) async fn send(&self, request: JsonRequest<'_>) -> CapturedResponse {
        let app = test::init_service(
            App::new()
                .app_data(self.state.clone())
                .app_data(web::Data::new(HealthState::new()))
                .wrap(Trace)
                .configure(configure)
                .default_service(web::to(route_not_found)),
        )
        .await;

        let JsonRequest {
            method,
            path,
            payload,
            token,
        } = request;
        let mut builder = test::TestRequest::default().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
        }
        if let Some(payload) = payload {
            builder = builder.set_json(payload);
        }

        let response = test::call_service(&app, builder.to_request()).await;
        let status = response.status();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let bytes = test::read_body(response).await;
        let body = serde_json::from_slice(&bytes).expect("response body is JSON");
        CapturedResponse {
            status,
            trace_id,
            body,
        }
    }

    /// Register `username` and return `(user id, token)`.
    pub(crate) async fn register(&self, username: &str) -> (String, String) {
        let response = self
            .send(JsonRequest::with_method(
                Method::POST,
                "/api/auth/register",
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "correct horse battery staple",
                }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        let data = &response.body["data"];
        (
            data["id"].as_str().expect("user id").to_owned(),
            data["token"].as_str().expect("token").to_owned(),
        )
    }
}

/// A layout object carrying every required field.
pub(crate) fn desk_object(id: &str) -> Value {
    json!({
        "id": id,
        "type": "desk",
        "name": "Desk",
        "position": [0.0, 0.0, 0.0],
        "rotation": [0.0, 0.0, 0.0],
        "scale": [1.0, 1.0, 1.0],
        "color": "#8b5a2b",
    })
}
