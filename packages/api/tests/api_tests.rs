// ABOUTME: Integration tests for the todo HTTP API
// ABOUTME: Drives the router end to end against an in-memory SQLite database

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use todoinfo_api::{create_router, AppState};
use todoinfo_storage::TodoStorage;

async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let storage = TodoStorage::new(pool);
    storage.ensure_schema().await.unwrap();
    create_router(AppState::new(storage, "testing"))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, headers, value)
}

async fn create(app: &Router, name: &str, task: &str) -> Value {
    let body = json!({ "name": name, "task": task }).to_string();
    let (status, _, value) = send(app, Method::POST, "/v1/todoInfo", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    value["todo"].clone()
}

#[tokio::test]
async fn test_healthcheck() {
    let app = test_app().await;

    let (status, _, body) = send(&app, Method::GET, "/v1/healthcheck", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "available");
    assert_eq!(body["system_info"]["environment"], "testing");
    assert!(body["system_info"]["version"].is_string());
}

#[tokio::test]
async fn test_create_todo() {
    let app = test_app().await;

    let (status, headers, body) = send(
        &app,
        Method::POST,
        "/v1/todoInfo",
        Some(r#"{"name":"Groceries","task":"Buy milk"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["todo"]["id"].as_i64().unwrap();
    assert_eq!(
        headers[header::LOCATION].to_str().unwrap(),
        format!("/v1/todoInfo/{}", id)
    );
    assert_eq!(body["todo"]["name"], "Groceries");
    assert_eq!(body["todo"]["task"], "Buy milk");
    assert_eq!(body["todo"]["version"], 1);
    assert!(body["todo"].get("created_at").is_none());
}

#[tokio::test]
async fn test_create_todo_validation() {
    let app = test_app().await;
    let too_long = "x".repeat(201);
    let body = json!({ "task": too_long }).to_string();

    let (status, _, body) = send(&app, Method::POST, "/v1/todoInfo", Some(&body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({
            "error": {
                "name": "must be provided",
                "task": "must not be more than 200 bytes long",
            }
        })
    );
}

#[tokio::test]
async fn test_create_todo_bad_json() {
    let app = test_app().await;

    for body in [r#"{"name":"a""#, r#"{"name":1,"task":"b"}"#, r#"{"name":"a","task":"b","extra":true}"#] {
        let (status, _, value) = send(&app, Method::POST, "/v1/todoInfo", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(value["error"].is_string());
    }
}

#[tokio::test]
async fn test_show_todo() {
    let app = test_app().await;
    let created = create(&app, "Garden", "Water the plants").await;
    let uri = format!("/v1/todoInfo/{}", created["id"]);

    let (status, _, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"], created);
}

#[tokio::test]
async fn test_show_missing_or_invalid_id() {
    let app = test_app().await;

    for uri in ["/v1/todoInfo/999", "/v1/todoInfo/0", "/v1/todoInfo/abc"] {
        let (status, _, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "the requested resource could not be found");
    }
}

#[tokio::test]
async fn test_partial_update() {
    let app = test_app().await;
    let created = create(&app, "Chores", "Vacuum").await;
    let uri = format!("/v1/todoInfo/{}", created["id"]);

    let (status, _, body) = send(&app, Method::PUT, &uri, Some(r#"{"task":"Vacuum and mop"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["name"], "Chores");
    assert_eq!(body["todo"]["task"], "Vacuum and mop");
    assert_eq!(body["todo"]["version"], 2);

    let (status, _, body) = send(&app, Method::PATCH, &uri, Some(r#"{"name":"House"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["name"], "House");
    assert_eq!(body["todo"]["task"], "Vacuum and mop");
    assert_eq!(body["todo"]["version"], 3);
}

#[tokio::test]
async fn test_update_with_stale_version_conflicts() {
    let app = test_app().await;
    let created = create(&app, "Chores", "Vacuum").await;
    let uri = format!("/v1/todoInfo/{}", created["id"]);

    let (status, _, _) = send(&app, Method::PUT, &uri, Some(r#"{"task":"first","version":1}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, Method::PUT, &uri, Some(r#"{"task":"second","version":1}"#)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "unable to update the record due to an edit conflict, please try again"
    );

    let (_, _, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["todo"]["task"], "first");
    assert_eq!(body["todo"]["version"], 2);
}

#[tokio::test]
async fn test_update_validation_and_missing() {
    let app = test_app().await;
    let created = create(&app, "Chores", "Vacuum").await;
    let uri = format!("/v1/todoInfo/{}", created["id"]);

    let (status, _, body) = send(&app, Method::PUT, &uri, Some(r#"{"name":""}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "must be provided");

    let (status, _, _) = send(&app, Method::PUT, "/v1/todoInfo/404", Some(r#"{"name":"x"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_todo() {
    let app = test_app().await;
    let created = create(&app, "Temporary", "Remove me").await;
    let uri = format!("/v1/todoInfo/{}", created["id"]);

    let (status, _, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "todo successfully deleted" }));

    let (status, _, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_empty() {
    let app = test_app().await;

    let (status, _, body) = send(&app, Method::GET, "/v1/todoInfo", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"], json!([]));
    assert_eq!(
        body["metadata"],
        json!({
            "current_page": 0,
            "page_size": 0,
            "first_page": 0,
            "last_page": 0,
            "total_records": 0,
        })
    );
}

#[tokio::test]
async fn test_list_filter_sort_and_paginate() {
    let app = test_app().await;
    create(&app, "Weekly groceries", "Buy milk").await;
    create(&app, "Garden", "Water plants").await;
    create(&app, "Monthly Groceries", "Buy rice").await;
    create(&app, "Groceries for party", "Buy cake").await;

    let (status, _, body) = send(
        &app,
        Method::GET,
        "/v1/todoInfo?name=groceries&task=buy&sort=-name&page=1&page_size=2",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["todo"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Weekly groceries", "Monthly Groceries"]);
    assert_eq!(body["metadata"]["total_records"], 3);
    assert_eq!(body["metadata"]["last_page"], 2);
    assert_eq!(body["metadata"]["current_page"], 1);
    assert_eq!(body["metadata"]["page_size"], 2);
}

#[tokio::test]
async fn test_list_rejects_bad_parameters() {
    let app = test_app().await;

    let (status, _, body) = send(&app, Method::GET, "/v1/todoInfo?sort=created_at", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["sort"], "invalid sort value");

    let (status, _, body) = send(&app, Method::GET, "/v1/todoInfo?page=abc&page_size=500", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["page"], "must be an integer value");
    assert_eq!(body["error"]["page_size"], "must be a maximum of 100");

    let (status, _, body) = send(&app, Method::GET, "/v1/todoInfo?page=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["page"], "must be greater than zero");
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let app = test_app().await;

    let (status, _, body) = send(&app, Method::GET, "/v1/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "the requested resource could not be found");

    let (status, _, body) = send(&app, Method::POST, "/v1/healthcheck", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "the POST method is not supported for this resource");
}
