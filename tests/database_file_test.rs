// ABOUTME: Tests for file-backed SQLite databases
// ABOUTME: Verifies migrations are idempotent and data survives a reconnect
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use larder::{database::Database, models::User};

#[tokio::test]
async fn test_data_survives_reconnect() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("larder-test.db");
    let url = format!("sqlite:{}?mode=rwc", db_path.display());

    let user_id = {
        let database = Database::new(&url, 2).await.unwrap();
        let user = User::new(
            "alice".to_owned(),
            "alice@example.com".to_owned(),
            "$2b$04$testhash".to_owned(),
        );
        database.users().create(&user).await.unwrap();
        user.id
    };

    // A fresh pool over the same file sees the data; migrations re-run cleanly
    let database = Database::new(&url, 2).await.unwrap();
    let user = database.users().get_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
}
