//! Comment threading, likes and cascading deletes.

#[expect(
    dead_code,
    reason = "Shared harness carries helpers used only by other integration suites."
)]
#[path = "support/api.rs"]
mod api;

use actix_web::http::{Method, StatusCode};
use api::{Api, JsonRequest};
use serde_json::{Value, json};

async fn layout(api: &Api) -> String {
    let response = api
        .send(JsonRequest::with_method(
            Method::POST,
            "/api/layouts",
            json!({"name": "Shared desk", "objects": []}),
        ))
        .await;
    response.body["data"]["id"]
        .as_str()
        .expect("layout id")
        .to_owned()
}

async fn post(api: &Api, token: &str, body: Value) -> Value {
    let response = api
        .send(JsonRequest::with_method(Method::POST, "/api/comments", body).bearer(token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"].clone()
}

async fn threads(api: &Api, layout_id: &str) -> Vec<Value> {
    let path = format!("/api/comments/{layout_id}");
    let response = api.send(JsonRequest::get(&path)).await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["data"].as_array().cloned().unwrap_or_default()
}

#[actix_web::test]
async fn replies_nest_under_their_parent() {
    let api = Api::new();
    let (_, ada) = api.register("ada").await;
    let (_, grace) = api.register("grace").await;
    let layout_id = layout(&api).await;

    let parent = post(&api, &ada, json!({"layoutId": layout_id, "content": "Great cable management"})).await;
    let reply = post(
        &api,
        &grace,
        json!({"layoutId": layout_id, "content": "Agreed", "parentId": parent["id"]}),
    )
    .await;
    assert_eq!(reply["parentId"], parent["id"]);
    assert_eq!(reply["username"], json!("grace"));

    let listing = threads(&api, &layout_id).await;
    assert_eq!(listing.len(), 1);
    let thread = listing.first().expect("one thread");
    assert_eq!(thread["id"], parent["id"]);
    assert_eq!(thread["replies"][0]["content"], json!("Agreed"));
}

#[actix_web::test]
async fn replies_to_replies_are_rejected() {
    let api = Api::new();
    let (_, ada) = api.register("ada").await;
    let layout_id = layout(&api).await;
    let parent = post(&api, &ada, json!({"layoutId": layout_id, "content": "Top"})).await;
    let reply = post(
        &api,
        &ada,
        json!({"layoutId": layout_id, "content": "Reply", "parentId": parent["id"]}),
    )
    .await;

    let nested = api
        .send(
            JsonRequest::with_method(
                Method::POST,
                "/api/comments",
                json!({"layoutId": layout_id, "content": "Too deep", "parentId": reply["id"]}),
            )
            .bearer(&ada),
        )
        .await;

    assert_eq!(nested.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn liking_toggles_per_user() {
    let api = Api::new();
    let (_, ada) = api.register("ada").await;
    let (grace_id, grace) = api.register("grace").await;
    let layout_id = layout(&api).await;
    let comment = post(&api, &ada, json!({"layoutId": layout_id, "content": "Like me"})).await;
    let like_path = format!("/api/comments/{}/like", comment["id"].as_str().expect("id"));

    let liked = api
        .send(JsonRequest::with_method(Method::PUT, &like_path, json!({})).bearer(&grace))
        .await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(liked.body["data"]["likes"], json!(1));
    assert_eq!(liked.body["data"]["likedBy"], json!([grace_id]));

    let unliked = api
        .send(JsonRequest::with_method(Method::PUT, &like_path, json!({})).bearer(&grace))
        .await;
    assert_eq!(unliked.body["data"]["likes"], json!(0));
    assert_eq!(unliked.body["data"]["likedBy"], json!([]));
}

#[actix_web::test]
async fn only_authors_edit_and_delete() {
    let api = Api::new();
    let (_, ada) = api.register("ada").await;
    let (_, grace) = api.register("grace").await;
    let layout_id = layout(&api).await;
    let comment = post(&api, &ada, json!({"layoutId": layout_id, "content": "Mine"})).await;
    let path = format!("/api/comments/{}", comment["id"].as_str().expect("id"));

    let hijack = api
        .send(JsonRequest::with_method(Method::PUT, &path, json!({"content": "Yours"})).bearer(&grace))
        .await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);

    let edited = api
        .send(JsonRequest::with_method(Method::PUT, &path, json!({"content": "Still mine"})).bearer(&ada))
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["data"]["content"], json!("Still mine"));

    let removal = JsonRequest {
        method: Method::DELETE,
        path: &path,
        payload: None,
        token: Some(&grace),
    };
    assert_eq!(api.send(removal).await.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn deleting_a_thread_removes_its_replies() {
    let api = Api::new();
    let (_, ada) = api.register("ada").await;
    let layout_id = layout(&api).await;
    let parent = post(&api, &ada, json!({"layoutId": layout_id, "content": "Parent"})).await;
    let reply = post(
        &api,
        &ada,
        json!({"layoutId": layout_id, "content": "Child", "parentId": parent["id"]}),
    )
    .await;

    let path = format!("/api/comments/{}", parent["id"].as_str().expect("id"));
    let deleted = api
        .send(JsonRequest {
            method: Method::DELETE,
            path: &path,
            payload: None,
            token: Some(&ada),
        })
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], json!("Comment deleted successfully"));
    assert!(threads(&api, &layout_id).await.is_empty());

    let like_path = format!("/api/comments/{}/like", reply["id"].as_str().expect("id"));
    let orphan = api
        .send(JsonRequest::with_method(Method::PUT, &like_path, json!({})).bearer(&ada))
        .await;
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn posting_requires_a_token() {
    let api = Api::new();
    let layout_id = layout(&api).await;
    let response = api
        .send(JsonRequest::with_method(
            Method::POST,
            "/api/comments",
            json!({"layoutId": layout_id, "content": "Anonymous"}),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
