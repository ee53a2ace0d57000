// ABOUTME: HTTP integration tests for the favorites toggle and listing routes
// ABOUTME: Covers toggle semantics, response messages, and error cases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

async fn create_recipe(
    resources: &std::sync::Arc<larder::server::ServerResources>,
    token: &str,
    title: &str,
) -> String {
    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::POST,
        "/api/recipes",
        Some(token),
        Some(json!({
            "title": title,
            "description": "A recipe used by the favorites tests.",
            "ingredients": [{"name": "salt", "quantity": 1.0, "unit": "tsp"}],
            "instructions": ["Mix"],
            "cooking_time": 5,
            "servings": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_toggle_adds_then_removes() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();
    let recipe_id = create_recipe(&resources, &token, "Toast").await;

    // First toggle adds
    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/favorites",
        Some(&token),
        Some(json!({"recipe_id": recipe_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Recipe added to favorites");
    assert_eq!(body["favorites"].as_array().unwrap().len(), 1);
    assert_eq!(body["favorites"][0]["title"], "Toast");

    // Listing recipes now marks it as a favorite
    let app = common::create_test_router(resources.clone());
    let (_, list) =
        common::send_request(app, Method::GET, "/api/recipes", Some(&token), None).await;
    assert_eq!(list["recipes"][0]["is_favorite"], true);

    // Second toggle removes
    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/favorites",
        Some(&token),
        Some(json!({"recipe_id": recipe_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Recipe removed from favorites");
    assert!(body["favorites"].as_array().unwrap().is_empty());

    let app = common::create_test_router(resources);
    let (status, body) =
        common::send_request(app, Method::GET, "/api/users/favorites", Some(&token), None)
            .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("msg").is_none());
    assert!(body["favorites"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_requires_existing_recipe() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    // Missing recipe_id
    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/favorites",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "recipe_id is required");

    // Malformed recipe id
    let app = common::create_test_router(resources.clone());
    let (status, _) = common::send_request(
        app,
        Method::PUT,
        "/api/users/favorites",
        Some(&token),
        Some(json!({"recipe_id": "not-a-uuid"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown recipe
    let app = common::create_test_router(resources);
    let (status, _) = common::send_request(
        app,
        Method::PUT,
        "/api/users/favorites",
        Some(&token),
        Some(json!({"recipe_id": uuid::Uuid::new_v4().to_string()})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_can_include_other_users_public_recipes() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, alice_token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();
    let (_, bob_token) = common::create_test_user(&resources, "bob", "bob@example.com")
        .await
        .unwrap();
    let recipe_id = create_recipe(&resources, &alice_token, "Alice Soup").await;

    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/favorites",
        Some(&bob_token),
        Some(json!({"recipe_id": recipe_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorites"][0]["title"], "Alice Soup");

    // Alice's own favorites list stays empty
    let app = common::create_test_router(resources);
    let (_, body) = common::send_request(
        app,
        Method::GET,
        "/api/users/favorites",
        Some(&alice_token),
        None,
    )
    .await;
    assert!(body["favorites"].as_array().unwrap().is_empty());
}
