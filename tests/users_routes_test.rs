// ABOUTME: HTTP integration tests for profile, preference, and password routes
// ABOUTME: Covers populated profiles, merge-update semantics, and account deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_profile_includes_recipes_favorites_and_pantry() {
    let resources = common::create_test_resources().await.unwrap();
    let (user, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    // Seed one authored recipe, one favorite, one pantry item
    let app = common::create_test_router(resources.clone());
    let (_, recipe) = common::send_request(
        app,
        Method::POST,
        "/api/recipes",
        Some(&token),
        Some(json!({
            "title": "Garlic Pasta",
            "description": "A simple weeknight pasta with garlic.",
            "ingredients": [{"name": "spaghetti", "quantity": 200.0, "unit": "g"}],
            "instructions": ["Boil", "Serve"],
            "cooking_time": 20,
            "servings": 2
        })),
    )
    .await;
    let recipe_id = recipe["id"].as_str().unwrap().to_owned();

    let app = common::create_test_router(resources.clone());
    common::send_request(
        app,
        Method::PUT,
        "/api/users/favorites",
        Some(&token),
        Some(json!({"recipe_id": recipe_id})),
    )
    .await;

    let app = common::create_test_router(resources.clone());
    common::send_request(
        app,
        Method::PUT,
        "/api/users/pantry",
        Some(&token),
        Some(json!({"items": [{"name": "flour"}]})),
    )
    .await;

    let app = common::create_test_router(resources);
    let (status, profile) =
        common::send_request(app, Method::GET, "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], user.id.to_string().as_str());
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["avatar"], "/uploads/avatars/default.png");
    assert!(profile.get("password_hash").is_none());
    assert_eq!(profile["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(profile["favorites"].as_array().unwrap().len(), 1);
    assert_eq!(profile["pantry"].as_array().unwrap().len(), 1);
    assert_eq!(profile["pantry"][0]["name"], "flour");
}

#[tokio::test]
async fn test_update_profile_changes_username() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources.clone());
    let (status, updated) = common::send_request(
        app,
        Method::PUT,
        "/api/users/profile",
        Some(&token),
        Some(json!({"username": "alice_cooks"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["username"], "alice_cooks");
    assert_eq!(updated["email"], "alice@example.com");
}

#[tokio::test]
async fn test_update_profile_rejects_taken_username() {
    let resources = common::create_test_resources().await.unwrap();
    common::create_test_user(&resources, "bob", "bob@example.com")
        .await
        .unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources);
    let (status, _) = common::send_request(
        app,
        Method::PUT,
        "/api/users/profile",
        Some(&token),
        Some(json!({"username": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_profile_validates_username_and_email() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/profile",
        Some(&token),
        Some(json!({"username": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Username must be between 3 and 30 characters"
    );

    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/profile",
        Some(&token),
        Some(json!({"email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Please provide a valid email");

    // Neither rejected update may persist
    let app = common::create_test_router(resources);
    let (status, profile) = common::send_request(
        app,
        Method::GET,
        "/api/users/profile",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["email"], "alice@example.com");
}

#[tokio::test]
async fn test_preferences_merge_keeps_unspecified_fields() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources.clone());
    let (status, first) = common::send_request(
        app,
        Method::PUT,
        "/api/users/preferences",
        Some(&token),
        Some(json!({
            "dietary_restrictions": ["vegetarian"],
            "cooking_skill_level": "advanced"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["preferences"]["dietary_restrictions"][0], "vegetarian");
    assert_eq!(first["preferences"]["cooking_skill_level"], "advanced");

    // Second partial update leaves the earlier fields intact
    let app = common::create_test_router(resources);
    let (status, second) = common::send_request(
        app,
        Method::PUT,
        "/api/users/preferences",
        Some(&token),
        Some(json!({"allergies": ["peanuts"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["preferences"]["allergies"][0], "peanuts");
    assert_eq!(second["preferences"]["dietary_restrictions"][0], "vegetarian");
    assert_eq!(second["preferences"]["cooking_skill_level"], "advanced");
    assert_eq!(second["preferences"]["meal_planning"], "weekly");
}

#[tokio::test]
async fn test_change_password_requires_current_password() {
    let resources = common::create_test_resources().await.unwrap();
    let (_, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    // Wrong current password
    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/password",
        Some(&token),
        Some(json!({"current_password": "wrong", "new_password": "newsecret"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Current password is incorrect");

    // New password too short
    let app = common::create_test_router(resources.clone());
    let (status, _) = common::send_request(
        app,
        Method::PUT,
        "/api/users/password",
        Some(&token),
        Some(json!({"current_password": "password123", "new_password": "tiny"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Successful change; the new password logs in, the old one does not
    let app = common::create_test_router(resources.clone());
    let (status, body) = common::send_request(
        app,
        Method::PUT,
        "/api/users/password",
        Some(&token),
        Some(json!({"current_password": "password123", "new_password": "newsecret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Password updated");

    let app = common::create_test_router(resources.clone());
    let (status, _) = common::send_request(
        app,
        Method::POST,
        "/api/users/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "newsecret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = common::create_test_router(resources);
    let (status, _) = common::send_request(
        app,
        Method::POST,
        "/api/users/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_account_removes_user_and_data() {
    let resources = common::create_test_resources().await.unwrap();
    let (user, token) = common::create_test_user(&resources, "alice", "alice@example.com")
        .await
        .unwrap();

    let app = common::create_test_router(resources.clone());
    common::send_request(
        app,
        Method::PUT,
        "/api/users/pantry",
        Some(&token),
        Some(json!({"items": [{"name": "flour"}]})),
    )
    .await;

    let app = common::create_test_router(resources.clone());
    let (status, body) =
        common::send_request(app, Method::DELETE, "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Account deleted");

    assert!(resources
        .database
        .users()
        .get_by_id(user.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        resources.database.pantry().count_for_user(user.id).await.unwrap(),
        0
    );

    // The old token no longer resolves to an account
    let app = common::create_test_router(resources);
    let (status, _) =
        common::send_request(app, Method::GET, "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
