//! HTTP-level integration tests for the `/projects` resource.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use common::{
    body_json, create_project, delete_auth, get, get_auth, patch_json_auth, post_json_auth,
    project_json, put_json_auth, send,
};
use serde_json::json;

use showcase_api::config::RateLimitConfig;

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_without_token_returns_401() {
    let test = common::build_test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/projects")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(project_json("alpha", "draft", 0).to_string()))
        .unwrap();
    let response = send(test.app(), request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn create_without_csrf_returns_403() {
    let test = common::build_test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/projects")
        .header(AUTHORIZATION, format!("Bearer {}", test.token("ana")))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(project_json("alpha", "draft", 0).to_string()))
        .unwrap();
    let response = send(test.app(), request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    // Nothing was written.
    let response = get_auth(test.app(), "/api/v1/projects/alpha", &test.token("ana")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_token_is_rejected_even_on_reads() {
    let test = common::build_test_app().await;
    let response = get_auth(test.app(), "/api/v1/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn write_budget_is_enforced() {
    let mut config = common::test_config();
    config.rate_limit = RateLimitConfig {
        write_max: 2,
        ..RateLimitConfig::default()
    };
    let test = common::build_test_app_with(config).await;
    let token = test.token("ana");

    for id in ["one", "two"] {
        let response =
            post_json_auth(test.app(), "/api/v1/projects", &token, project_json(id, "draft", 0))
                .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = post_json_auth(
        test.app(),
        "/api/v1/projects",
        &token,
        project_json("three", "draft", 0),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(response).await["code"], "RATE_LIMITED");

    // Reads draw from their own budget.
    let response = get(test.app(), "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_history() {
    let test = common::build_test_app().await;
    let json = create_project(&test, "north-star", "published", 3).await;

    assert_eq!(json["data"]["id"], "north-star");
    assert_eq!(json["data"]["order"], 3);
    assert_eq!(json["data"]["updated_by"], "ana");
    assert_eq!(json["data"]["history"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["history"][0]["action"], "create");
}

#[tokio::test]
async fn duplicate_id_returns_409() {
    let test = common::build_test_app().await;
    create_project(&test, "alpha", "draft", 0).await;

    let response = post_json_auth(
        test.app(),
        "/api/v1/projects",
        &test.token("ben"),
        project_json("alpha", "draft", 0),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_body_returns_400() {
    let test = common::build_test_app().await;
    let mut body = project_json("alpha", "draft", 0);
    body["i18n"] = json!({ "fr": { "title": "Sans anglais" } });

    let response = post_json_auth(test.app(), "/api/v1/projects", &test.token("ana"), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn drafts_are_hidden_from_anonymous_readers() {
    let test = common::build_test_app().await;
    create_project(&test, "draft-one", "draft", 0).await;

    let response = get(test.app(), "/api/v1/projects/draft-one").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(test.app(), "/api/v1/projects/draft-one", &test.token("ana")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn public_list_shows_published_only_without_history() {
    let test = common::build_test_app().await;
    create_project(&test, "alpha", "published", 0).await;
    create_project(&test, "beta", "draft", 0).await;

    let json = body_json(get(test.app(), "/api/v1/projects?include_deleted=true&status=draft").await).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["id"], "alpha");
    assert_eq!(json["data"]["items"][0]["history"], json!([]));

    let json = body_json(get_auth(test.app(), "/api/v1/projects", &test.token("ana")).await).await;
    assert_eq!(json["data"]["total"], 2);
}

#[tokio::test]
async fn equal_order_lists_earlier_creation_first() {
    let test = common::build_test_app().await;
    create_project(&test, "zulu", "published", 0).await;
    create_project(&test, "alpha", "published", 0).await;
    create_project(&test, "first", "published", -1).await;

    let json = body_json(get(test.app(), "/api/v1/projects").await).await;
    let ids: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["first", "zulu", "alpha"]);
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let test = common::build_test_app().await;
    for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
        create_project(&test, id, "published", i as i32).await;
    }

    let json = body_json(get(test.app(), "/api/v1/projects?limit=2&offset=1").await).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["limit"], 2);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["items"][0]["id"], "b");

    let json = body_json(get(test.app(), "/api/v1/projects?q=PROJECT%20c").await).await;
    assert_eq!(json["data"]["total"], 1);

    let json = body_json(get(test.app(), "/api/v1/projects?category=branding").await).await;
    assert_eq!(json["data"]["total"], 0);
}

#[tokio::test]
async fn replace_featured_without_hero_returns_422() {
    let test = common::build_test_app().await;
    create_project(&test, "alpha", "published", 0).await;

    let mut body = project_json("alpha", "published", 0);
    body.as_object_mut().unwrap().remove("id");
    body["featured"] = json!(true);

    let response =
        put_json_auth(test.app(), "/api/v1/projects/alpha", &test.token("ana"), body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "GATE_VIOLATION");

    // The rejected write left no trace.
    let json = body_json(get_auth(test.app(), "/api/v1/projects/alpha", &test.token("ana")).await).await;
    assert_eq!(json["data"]["featured"], false);
    assert_eq!(json["data"]["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn merge_updates_only_given_fields() {
    let test = common::build_test_app().await;
    create_project(&test, "alpha", "draft", 0).await;

    let response = patch_json_auth(
        test.app(),
        "/api/v1/projects/alpha",
        &test.token("ben"),
        json!({ "status": "published", "city": "Nantes" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["city"], "Nantes");
    assert_eq!(json["data"]["i18n"]["fr"]["title"], "Projet alpha");
    assert_eq!(json["data"]["updated_by"], "ben");
}

#[tokio::test]
async fn merge_rejects_unknown_fields() {
    let test = common::build_test_app().await;
    create_project(&test, "alpha", "draft", 0).await;

    let response = patch_json_auth(
        test.app(),
        "/api/v1/projects/alpha",
        &test.token("ana"),
        json!({ "history": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn reorder_sets_order() {
    let test = common::build_test_app().await;
    create_project(&test, "alpha", "published", 0).await;

    let response = put_json_auth(
        test.app(),
        "/api/v1/projects/alpha/order",
        &test.token("ana"),
        json!({ "order": 7 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["order"], 7);
}

// ---------------------------------------------------------------------------
// Soft delete and history
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_restore_round_trip() {
    let test = common::build_test_app().await;
    let token = test.token("ana");
    let created = create_project(&test, "alpha", "published", 0).await;

    let response = delete_auth(test.app(), "/api/v1/projects/alpha", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["deleted"], true);

    // Idempotent.
    let response = delete_auth(test.app(), "/api/v1/projects/alpha", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(test.app(), "/api/v1/projects/alpha").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = common::mutate(
        test.app(),
        axum::http::Method::POST,
        "/api/v1/projects/alpha/restore",
        &token,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let restored = body_json(response).await;
    assert_eq!(restored["data"]["deleted"], false);
    assert_eq!(restored["data"]["i18n"], created["data"]["i18n"]);

    let json = body_json(get_auth(test.app(), "/api/v1/projects/alpha/history", &token).await).await;
    let actions: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, ["create", "soft_delete", "soft_delete", "restore"]);
}

#[tokio::test]
async fn history_requires_auth() {
    let test = common::build_test_app().await;
    create_project(&test, "alpha", "published", 0).await;

    let response = get(test.app(), "/api/v1/projects/alpha/history").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_project_returns_404() {
    let test = common::build_test_app().await;
    let response = patch_json_auth(
        test.app(),
        "/api/v1/projects/ghost",
        &test.token("ana"),
        json!({ "order": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
