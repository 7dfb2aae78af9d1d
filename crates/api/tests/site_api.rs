//! HTTP-level integration tests for team members and page headers.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete_auth, get, get_auth, mutate, post_json_auth, put_json_auth};
use serde_json::{json, Value};

fn member_json(id: &str, name: &str, order: i32) -> Value {
    json!({
        "id": id,
        "name": name,
        "order": order,
        "i18n": {
            "en": { "role": "Producer", "bio": "Runs the floor." },
            "fr": { "role": "Productrice" }
        }
    })
}

fn header_json(title: &str) -> Value {
    json!({
        "i18n": {
            "en": { "title": title, "subtitle": "Selected work" }
        }
    })
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[tokio::test]
async fn team_members_list_in_display_order() {
    let test = common::build_test_app().await;
    let token = test.token("ana");
    for (id, name, order) in [("lea", "Léa Martin", 2), ("sam", "Sam Okafor", 1)] {
        let response =
            post_json_auth(test.app(), "/api/v1/team", &token, member_json(id, name, order)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get(test.app(), "/api/v1/team").await).await;
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["sam", "lea"]);
}

#[tokio::test]
async fn deleted_members_are_hidden_then_restored() {
    let test = common::build_test_app().await;
    let token = test.token("ana");
    post_json_auth(test.app(), "/api/v1/team", &token, member_json("lea", "Léa Martin", 0)).await;

    let response = delete_auth(test.app(), "/api/v1/team/lea", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(test.app(), "/api/v1/team").await).await;
    assert_eq!(json["data"], json!([]));
    let response = get(test.app(), "/api/v1/team/lea").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Staff can still see it.
    let json = body_json(get_auth(test.app(), "/api/v1/team?include_deleted=true", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = mutate(test.app(), Method::POST, "/api/v1/team/lea/restore", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get(test.app(), "/api/v1/team/lea").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn replace_member_keeps_id() {
    let test = common::build_test_app().await;
    let token = test.token("ana");
    post_json_auth(test.app(), "/api/v1/team", &token, member_json("lea", "Léa Martin", 0)).await;

    let mut body = member_json("ignored", "Léa Martin-Roy", 4);
    body.as_object_mut().unwrap().remove("id");
    let response = put_json_auth(test.app(), "/api/v1/team/lea", &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "lea");
    assert_eq!(json["data"]["name"], "Léa Martin-Roy");
    assert_eq!(json["data"]["order"], 4);
}

// ---------------------------------------------------------------------------
// Page headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn header_upsert_creates_then_updates() {
    let test = common::build_test_app().await;
    let token = test.token("ana");

    let response = get(test.app(), "/api/v1/headers/work").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(test.app(), "/api/v1/headers/work", &token, header_json("Work")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        put_json_auth(test.app(), "/api/v1/headers/work", &token, header_json("Our work")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["history"].as_array().unwrap().len(), 2);

    let json = body_json(get(test.app(), "/api/v1/headers/work").await).await;
    assert_eq!(json["data"]["i18n"]["en"]["title"], "Our work");

    let json = body_json(get(test.app(), "/api/v1/headers").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn header_upsert_requires_auth() {
    let test = common::build_test_app().await;
    let response = common::send(
        test.app(),
        axum::http::Request::builder()
            .method(Method::PUT)
            .uri("/api/v1/headers/work")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(header_json("Work").to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
