// ABOUTME: HTTP integration tests for pantry inventory routes
// ABOUTME: Covers bulk append, removal, the expiring view, and per-user isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

#[tokio::test]
async fn test_pantry_bulk_add_and_list() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/pantry",
        Some(&token),
        Some(json!({
            "items": [
                {"name": "flour", "quantity": "1", "unit": "kg", "category": "baking"},
                {"name": "milk", "quantity": "2", "unit": "l"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Items added to pantry");
    assert_eq!(body["total_items"], 2);
    assert_eq!(body["pantry"].as_array().unwrap().len(), 2);

    let app = common::create_test_router(resources);
    let (status, body) =
        common::send_request(app, Method::GET, "/api/users/pantry", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("msg").is_none());
    assert_eq!(body["total_items"], 2);
    let names: Vec<&str> = body["pantry"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"flour"));
    assert!(names.contains(&"milk"));
}

#[tokio::test]
async fn test_pantry_add_validates_items() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources.clone());
    let (status, _) = common::send_request(
        app,
        Method::PUT,
        "/api/users/pantry",
        Some(&token),
        Some(json!({"items": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = common::create_test_router(resources);
    let (status, _) = common::send_request(
        app,
        Method::PUT,
        "/api/users/pantry",
        Some(&token),
        Some(json!({"items": [{"name": "  "}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pantry_remove_item() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources.clone());
    let (_, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/pantry",
        Some(&token),
        Some(json!({"items": [{"name": "flour"}, {"name": "milk"}]})),
    )
    .await;
    let item_id = body["pantry"][0]["id"].as_str().unwrap().to_owned();

    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::DELETE,
        &format!("/api/users/pantry/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Item removed from pantry");
    assert_eq!(body["total_items"], 1);

    // Removing it again is a 404
    let app = common::create_test_router(resources.clone());
    let (status, _) = common::send_request(
        app,
        Method::DELETE,
        &format!("/api/users/pantry/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Malformed item id is a 400
    let app = common::create_test_router(resources);
    let (status, _) = common::send_request(
        app,
        Method::DELETE,
        "/api/users/pantry/not-a-uuid",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pantry_is_isolated_per_user() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, alice_token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();
    let (_, bob_token) = common::create_test_user(&resources, "bob", "bob@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources.clone());
    let (_, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/pantry",
        Some(&alice_token),
        Some(json!({"items": [{"name": "flour"}]})),
    )
    .await;
    let item_id = body["pantry"][0]["id"].as_str().unwrap().to_owned();

    // Bob sees an empty pantry and cannot remove Alice's item
    let app = common::create_test_router(resources.clone());
    let (status, body) =
        common::send_request(app, Method::GET, "/api/users/pantry", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 0);

    let app = common::create_test_router(resources.clone());
    let (status, _) = common::send_request(
        app,
        Method::DELETE,
        &format!("/api/users/pantry/{item_id}"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice still has her item
    let app = common::create_test_router(resources);
    let (_, body) = common::send_request(
        app,
        Method::GET,
        "/api/users/pantry",
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(body["total_items"], 1);
}

#[tokio::test]
async fn test_expiring_view_uses_window_and_includes_expired() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let app = common::create_test_router(resources.clone());
    let (status, _) = common::send_request(
        app,
        Method::PUT,
        "/api/users/pantry",
        Some(&token),
        Some(json!({
            "items": [
                {"name": "old milk", "expiry_date": (today - Duration::days(2)).to_string()},
                {"name": "yogurt", "expiry_date": (today + Duration::days(3)).to_string()},
                {"name": "cheese", "expiry_date": (today + Duration::days(20)).to_string()},
                {"name": "salt"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Default window is 7 days
    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::GET,
        "/api/users/pantry/expiring",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window_days"], 7);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["old milk", "yogurt"]);

    // A wider window picks up the cheese; items without dates never appear
    let app = common::create_test_router(resources);
    let (status, body) = common::send_request(
        app,
        Method::GET,
        "/api/users/pantry/expiring?days=30",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window_days"], 30);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}
