// ABOUTME: Database-level tests for the pantry manager
// ABOUTME: Covers the atomic item cap, removal, and the expiring window query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::{Duration, Utc};
use larder::{
    constants::limits::MAX_PANTRY_ITEMS,
    database::pantry::AddPantryItemRequest,
    errors::ErrorCode,
    models::User,
};
use uuid::Uuid;

fn item(name: &str) -> AddPantryItemRequest {
    AddPantryItemRequest {
        name: name.to_owned(),
        quantity: None,
        unit: None,
        category: None,
        expiry_date: None,
    }
}

async fn seed_user(database: &larder::database::Database, name: &str) -> User {
    let user = User::new(
        name.to_owned(),
        format!("{name}@example.com"),
        "$2b$04$testhash".to_owned(),
    );
    database.users().create(&user).await.unwrap();
    user
}

#[tokio::test]
async fn test_add_items_persists_fields() {
    let database = common::create_test_database().await.unwrap();
    let user = seed_user(&database, "alice").await;

    let expiry = Utc::now().date_naive() + Duration::days(5);
    let requests = vec![AddPantryItemRequest {
        name: "milk".to_owned(),
        quantity: Some("2".to_owned()),
        unit: Some("l".to_owned()),
        category: Some("dairy".to_owned()),
        expiry_date: Some(expiry),
    }];

    let added = database.pantry().add_items(user.id, &requests).await.unwrap();
    assert_eq!(added.len(), 1);

    let listed = database.pantry().list_for_user(user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "milk");
    assert_eq!(listed[0].quantity.as_deref(), Some("2"));
    assert_eq!(listed[0].unit.as_deref(), Some("l"));
    assert_eq!(listed[0].category.as_deref(), Some("dairy"));
    assert_eq!(listed[0].expiry_date, Some(expiry));
}

#[tokio::test]
async fn test_pantry_cap_rejects_whole_batch() {
    let database = common::create_test_database().await.unwrap();
    let user = seed_user(&database, "alice").await;

    let near_cap: Vec<AddPantryItemRequest> = (0..MAX_PANTRY_ITEMS - 5)
        .map(|i| item(&format!("item {i}")))
        .collect();
    database.pantry().add_items(user.id, &near_cap).await.unwrap();

    // A batch that would cross the cap inserts nothing at all
    let overflow: Vec<AddPantryItemRequest> =
        (0..10).map(|i| item(&format!("extra {i}"))).collect();
    let err = database
        .pantry()
        .add_items(user.id, &overflow)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::LimitExceeded);
    assert_eq!(
        i64::from(database.pantry().count_for_user(user.id).await.unwrap()),
        MAX_PANTRY_ITEMS - 5
    );

    // A batch that exactly reaches the cap is accepted
    let fills: Vec<AddPantryItemRequest> = (0..5).map(|i| item(&format!("fill {i}"))).collect();
    database.pantry().add_items(user.id, &fills).await.unwrap();
    assert_eq!(
        i64::from(database.pantry().count_for_user(user.id).await.unwrap()),
        MAX_PANTRY_ITEMS
    );

    let err = database
        .pantry()
        .add_items(user.id, &[item("past the cap")])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::LimitExceeded);
}

#[tokio::test]
async fn test_remove_item_is_scoped_to_owner() {
    let database = common::create_test_database().await.unwrap();
    let alice = seed_user(&database, "alice").await;
    let bob = seed_user(&database, "bob").await;

    let added = database
        .pantry()
        .add_items(alice.id, &[item("flour")])
        .await
        .unwrap();
    let item_id = added[0].id;

    let err = database.pantry().remove_item(bob.id, item_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    database.pantry().remove_item(alice.id, item_id).await.unwrap();
    assert_eq!(database.pantry().count_for_user(alice.id).await.unwrap(), 0);

    let err = database
        .pantry()
        .remove_item(alice.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_expiring_within_orders_by_date_and_skips_undated() {
    let database = common::create_test_database().await.unwrap();
    let user = seed_user(&database, "alice").await;

    let today = Utc::now().date_naive();
    let mut yogurt = item("yogurt");
    yogurt.expiry_date = Some(today + Duration::days(3));
    let mut expired = item("old milk");
    expired.expiry_date = Some(today - Duration::days(1));
    let mut distant = item("cheese");
    distant.expiry_date = Some(today + Duration::days(60));

    database
        .pantry()
        .add_items(user.id, &[yogurt, expired, distant, item("salt")])
        .await
        .unwrap();

    let soon = database.pantry().expiring_within(user.id, 7).await.unwrap();
    let names: Vec<&str> = soon.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["old milk", "yogurt"]);

    // Boundary: an item expiring exactly at the window edge is included
    let edge = database.pantry().expiring_within(user.id, 3).await.unwrap();
    assert!(edge.iter().any(|i| i.name == "yogurt"));

    let wide = database.pantry().expiring_within(user.id, 365).await.unwrap();
    assert_eq!(wide.len(), 3);
}
