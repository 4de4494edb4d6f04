//! End-to-end layout flows over the in-memory stores.

#[path = "support/api.rs"]
mod api;

use actix_web::http::{Method, StatusCode};
use api::{Api, JsonRequest, desk_object};
use rstest::rstest;
use serde_json::{Value, json};

async fn create_layout(api: &Api, body: Value) -> Value {
    let response = api
        .send(JsonRequest::with_method(Method::POST, "/api/layouts", body))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"].clone()
}

#[actix_web::test]
async fn created_layout_reads_back_identically() {
    let api = Api::new();
    let created = create_layout(
        &api,
        json!({"name": "Desk Setup", "objects": [desk_object("o1")]}),
    )
    .await;
    let id = created["id"].as_str().expect("layout id");
    assert_eq!(created["objects"].as_array().map(Vec::len), Some(1));

    let path = format!("/api/layouts/{id}");
    let fetched = api.send(JsonRequest::get(&path)).await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["objects"], created["objects"]);
    assert_eq!(fetched.body["data"]["objects"][0], desk_object("o1"));
    assert_eq!(fetched.body["data"]["isPublic"], json!(false));
}

#[actix_web::test]
async fn invalid_object_names_its_index() {
    let api = Api::new();
    let response = api
        .send(JsonRequest::with_method(
            Method::POST,
            "/api/layouts",
            json!({
                "name": "Broken",
                "objects": [desk_object("o1"), {"id": "o2", "name": "Chair"}],
            }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(response.body["details"]["index"], json!(1));
    assert_eq!(response.body["details"]["field"], json!("objects"));
    assert!(response.trace_id.is_some());
}

#[actix_web::test]
async fn empty_update_keeps_content() {
    let api = Api::new();
    let created = create_layout(
        &api,
        json!({"name": "Corner", "objects": [desk_object("o1")], "isPublic": true}),
    )
    .await;
    let path = format!("/api/layouts/{}", created["id"].as_str().expect("id"));

    let updated = api
        .send(JsonRequest::with_method(Method::PUT, &path, json!({})))
        .await;

    assert_eq!(updated.status, StatusCode::OK);
    let data = &updated.body["data"];
    assert_eq!(data["name"], created["name"]);
    assert_eq!(data["objects"], created["objects"]);
    assert_eq!(data["isPublic"], json!(true));
    assert!(data["updatedAt"].as_str() >= created["updatedAt"].as_str());
    assert_eq!(updated.body["message"], json!("Layout updated successfully"));
}

#[actix_web::test]
async fn deleting_twice_reports_not_found() {
    let api = Api::new();
    let created = create_layout(&api, json!({"name": "Temp", "objects": []})).await;
    let path = format!("/api/layouts/{}", created["id"].as_str().expect("id"));

    let first = api
        .send(JsonRequest {
            method: Method::DELETE,
            path: &path,
            payload: None,
            token: None,
        })
        .await;
    let second = api
        .send(JsonRequest {
            method: Method::DELETE,
            path: &path,
            payload: None,
            token: None,
        })
        .await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["message"], json!("Layout deleted successfully"));
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(second.body["error"], json!("Layout not found"));
}

#[rstest]
#[case("/api/layouts/not-a-uuid")]
#[case("/api/layouts/00000000-0000-0000-0000-000000000000")]
#[actix_web::test]
async fn unknown_layouts_are_not_found(#[case] path: &str) {
    let api = Api::new();
    let response = api.send(JsonRequest::get(path)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], json!("not_found"));
}

#[rstest]
#[case(json!("demo-user"), json!(null))]
#[case(json!("00000000-0000-0000-0000-0000000000aa"), json!("00000000-0000-0000-0000-0000000000aa"))]
#[actix_web::test]
async fn anonymous_layouts_accept_any_claimed_owner(#[case] claimed: Value, #[case] owner: Value) {
    let api = Api::new();

    let created = create_layout(
        &api,
        json!({"name": "Desk", "objects": [], "userId": claimed}),
    )
    .await;

    assert_eq!(created.get("userId").cloned().unwrap_or(Value::Null), owner);
}

#[actix_web::test]
async fn token_holder_owns_created_layouts() {
    let api = Api::new();
    let (user_id, token) = api.register("grace").await;

    let response = api
        .send(
            JsonRequest::with_method(
                Method::POST,
                "/api/layouts",
                json!({"name": "Mine", "objects": [], "userId": "ignored"}),
            )
            .bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["userId"], json!(user_id));

    let path = format!("/api/layouts?userId={user_id}");
    let listing = api.send(JsonRequest::get(&path)).await;
    assert_eq!(listing.body["data"].as_array().map(Vec::len), Some(1));

    let unmatched = api
        .send(JsonRequest::get("/api/layouts?userId=nobody"))
        .await;
    assert_eq!(unmatched.body["data"], json!([]));
}

#[actix_web::test]
async fn forking_copies_and_counts() {
    let api = Api::new();
    let (forker_id, token) = api.register("linus").await;
    let source = create_layout(
        &api,
        json!({"name": "Battlestation", "objects": [desk_object("o1")], "isPublic": true}),
    )
    .await;
    let source_id = source["id"].as_str().expect("id");
    let fork_path = format!("/api/layouts/{source_id}/fork");

    let anonymous = api
        .send(JsonRequest::with_method(Method::POST, &fork_path, json!({})))
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let fork = api
        .send(JsonRequest::with_method(Method::POST, &fork_path, json!({})).bearer(&token))
        .await;
    assert_eq!(fork.status, StatusCode::CREATED);
    let data = &fork.body["data"];
    assert_eq!(data["name"], json!("Battlestation (Fork)"));
    assert_eq!(data["forkedFrom"], json!(source_id));
    assert_eq!(data["userId"], json!(forker_id));
    assert_eq!(data["objects"], source["objects"]);
    assert_ne!(data["id"], source["id"]);

    let source_path = format!("/api/layouts/{source_id}");
    let refreshed = api.send(JsonRequest::get(&source_path)).await;
    assert_eq!(refreshed.body["data"]["forkCount"], json!(1));

    let public = api.send(JsonRequest::get("/api/layouts/public")).await;
    assert_eq!(public.body["data"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn fork_bodies_are_optional_but_must_be_well_formed() {
    let api = Api::new();
    let (_, token) = api.register("grace").await;
    let source = create_layout(&api, json!({"name": "Desk", "objects": []})).await;
    let fork_path = format!("/api/layouts/{}/fork", source["id"].as_str().expect("id"));

    let bodiless = api
        .send(JsonRequest {
            method: Method::POST,
            path: &fork_path,
            payload: None,
            token: Some(&token),
        })
        .await;
    assert_eq!(bodiless.status, StatusCode::CREATED);
    assert_eq!(bodiless.body["data"]["name"], json!("Desk (Fork)"));

    let malformed = api
        .send(JsonRequest::with_method(Method::POST, &fork_path, json!("Desk copy")).bearer(&token))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.body["error"], json!("Malformed JSON body"));
    assert!(malformed.body["details"]["cause"].is_string());
}
