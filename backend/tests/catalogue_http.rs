//! Templates, custom objects and the object catalogue over HTTP.

#[expect(
    dead_code,
    reason = "Shared harness carries helpers used only by other integration suites."
)]
#[path = "support/api.rs"]
mod api;

use actix_web::http::{Method, StatusCode};
use api::{Api, JsonRequest, desk_object};
use serde_json::{Value, json};

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

async fn create_template(api: &Api, token: &str, body: Value) -> Value {
    let response = api
        .send(JsonRequest::with_method(Method::POST, "/api/templates", body).bearer(token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"].clone()
}

#[actix_web::test]
async fn template_reads_count_as_uses() {
    let api = Api::new();
    let (_, token) = api.register("ada").await;
    let template = create_template(
        &api,
        &token,
        json!({"name": "Minimal", "category": "Office", "objects": [desk_object("o1")], "isPublic": true}),
    )
    .await;
    let path = format!("/api/templates/{}", template["id"].as_str().expect("id"));

    api.send(JsonRequest::get(&path)).await;
    let second = api.send(JsonRequest::get(&path)).await;

    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["data"]["usageCount"], json!(2));
}

#[actix_web::test]
async fn template_listing_filters_by_category_and_visibility() {
    let api = Api::new();
    let (owner_id, token) = api.register("ada").await;
    create_template(
        &api,
        &token,
        json!({"name": "Battlestation", "category": "Gaming", "isPublic": true}),
    )
    .await;
    create_template(
        &api,
        &token,
        json!({"name": "Home office", "category": "Office", "isPublic": true}),
    )
    .await;
    create_template(
        &api,
        &token,
        json!({"name": "Secret", "category": "Gaming", "isPublic": false}),
    )
    .await;

    let gaming = api
        .send(JsonRequest::get("/api/templates?category=Gaming"))
        .await;
    assert_eq!(names(&gaming.body), vec!["Battlestation".to_owned()]);

    let everything = api.send(JsonRequest::get("/api/templates?category=All")).await;
    assert_eq!(names(&everything.body).len(), 2);

    let own_path = format!("/api/templates?category=Gaming&userId={owner_id}");
    let own = api.send(JsonRequest::get(&own_path)).await;
    assert_eq!(names(&own.body).len(), 2);
}

#[actix_web::test]
async fn only_owners_change_templates() {
    let api = Api::new();
    let (_, ada) = api.register("ada").await;
    let (_, grace) = api.register("grace").await;
    let template = create_template(
        &api,
        &ada,
        json!({"name": "Corner", "category": "Office", "isPublic": true}),
    )
    .await;
    let path = format!("/api/templates/{}", template["id"].as_str().expect("id"));

    let hijack = api
        .send(JsonRequest::with_method(Method::PUT, &path, json!({"name": "Mine now"})).bearer(&grace))
        .await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);

    let renamed = api
        .send(JsonRequest::with_method(Method::PUT, &path, json!({"name": "Cosy corner"})).bearer(&ada))
        .await;
    assert_eq!(renamed.body["data"]["name"], json!("Cosy corner"));

    let deleted = api
        .send(JsonRequest {
            method: Method::DELETE,
            path: &path,
            payload: None,
            token: Some(&ada),
        })
        .await;
    assert_eq!(deleted.body["message"], json!("Template deleted successfully"));
    assert_eq!(api.send(JsonRequest::get(&path)).await.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn private_custom_objects_stay_private() {
    let api = Api::new();
    let (owner_id, token) = api.register("ada").await;
    let body = |name: &str, public: bool| {
        json!({
            "name": name,
            "type": "box",
            "geometry": {"type": "box", "args": [1.0, 0.1, 0.4]},
            "scale": [1.0, 1.0, 1.0],
            "isPublic": public,
        })
    };
    for (name, public) in [("Shelf", true), ("Prototype", false)] {
        let response = api
            .send(JsonRequest::with_method(Method::POST, "/api/custom-objects", body(name, public)).bearer(&token))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        assert_eq!(response.body["data"]["material"]["roughness"], json!(0.5));
    }

    let anonymous = api.send(JsonRequest::get("/api/custom-objects")).await;
    assert_eq!(names(&anonymous.body), vec!["Shelf".to_owned()]);

    let path = format!("/api/custom-objects?userId={owner_id}");
    let own = api.send(JsonRequest::get(&path)).await;
    assert_eq!(names(&own.body).len(), 2);
}

#[actix_web::test]
async fn custom_objects_are_deleted_by_owners_only() {
    let api = Api::new();
    let (_, ada) = api.register("ada").await;
    let (_, grace) = api.register("grace").await;
    let created = api
        .send(
            JsonRequest::with_method(
                Method::POST,
                "/api/custom-objects",
                json!({"name": "Lamp", "type": "cylinder", "geometry": {"type": "cylinder"}, "scale": [1, 2, 1]}),
            )
            .bearer(&ada),
        )
        .await;
    let path = format!(
        "/api/custom-objects/{}",
        created.body["data"]["id"].as_str().expect("id")
    );

    let forbidden = api
        .send(JsonRequest {
            method: Method::DELETE,
            path: &path,
            payload: None,
            token: Some(&grace),
        })
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["error"], json!("Not authorized to delete this object"));

    let deleted = api
        .send(JsonRequest {
            method: Method::DELETE,
            path: &path,
            payload: None,
            token: Some(&ada),
        })
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
}

#[actix_web::test]
async fn object_catalogue_seeds_once_and_filters() {
    let api = Api::new();
    let (_, token) = api.register("ada").await;
    let seed = || JsonRequest::with_method(Method::POST, "/api/objects/seed", json!({})).bearer(&token);

    let first = api.send(seed()).await;
    let second = api.send(seed()).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["message"], json!("Objects seeded successfully"));
    assert_eq!(names(&first.body).len(), names(&second.body).len());

    let all = api.send(JsonRequest::get("/api/objects")).await;
    let category = all.body["data"][0]["category"]
        .as_str()
        .expect("category")
        .to_owned();
    let path = format!("/api/objects?category={category}");
    let filtered = api.send(JsonRequest::get(&path)).await;
    let entries = filtered.body["data"].as_array().cloned().unwrap_or_default();
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|entry| entry["category"] == json!(category)));
}
