// SPDX-License-Identifier: MIT

//! Firestore integration tests (require emulator).
//!
//! Run with: FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test
//!
//! These exercise the store-backed invariants: one user row per external
//! identity, favorites scoped to their owner, and single-use OAuth state.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chefgpt::models::{FavoriteRecipe, OAuthState, User};
use tower::ServiceExt;
use uuid::Uuid;

mod common;

/// A fresh external identity per test, so runs don't collide on the
/// shared emulator dataset.
fn unique_external_id() -> u64 {
    Uuid::new_v4().as_u128() as u64
}

fn test_user(github_user_id: u64) -> User {
    User {
        id: Uuid::new_v4(),
        github_user_id,
        email: format!("user{}@users.noreply.github.com", github_user_id),
        name: format!("user{}", github_user_id),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn test_favorite(user_id: Uuid, recipe_id: &str) -> FavoriteRecipe {
    FavoriteRecipe {
        id: Uuid::new_v4(),
        user_id,
        recipe_id: recipe_id.to_string(),
        recipe_name: format!("Recipe {}", recipe_id),
        recipe_detail: "Simmer gently.".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

// ─── User Directory ──────────────────────────────────────────

#[tokio::test]
async fn test_user_row_is_unique_per_external_identity() {
    require_emulator!();
    let db = common::test_db().await;

    let external_id = unique_external_id();
    let first = test_user(external_id);
    db.insert_user(&first).await.expect("first insert");

    let fetched = db
        .get_user_by_github_id(external_id)
        .await
        .expect("lookup")
        .expect("user should exist");
    assert_eq!(fetched.id, first.id);

    // A second insert for the same external identity must be rejected by
    // the store, not silently create another row.
    let second = test_user(external_id);
    assert!(db.insert_user(&second).await.is_err());

    // The original internal id survives
    let fetched_again = db
        .get_user_by_github_id(external_id)
        .await
        .expect("lookup")
        .expect("user should exist");
    assert_eq!(fetched_again.id, first.id);
}

#[tokio::test]
async fn test_unknown_external_identity_resolves_to_none() {
    require_emulator!();
    let db = common::test_db().await;

    let absent = db
        .get_user_by_github_id(unique_external_id())
        .await
        .expect("lookup");
    assert!(absent.is_none());
}

// ─── Favorites ───────────────────────────────────────────────

#[tokio::test]
async fn test_favorites_are_scoped_to_their_owner() {
    require_emulator!();
    let db = common::test_db().await;

    let owner = test_user(unique_external_id());
    let other = test_user(unique_external_id());
    db.insert_user(&owner).await.expect("insert owner");
    db.insert_user(&other).await.expect("insert other");

    let saved = test_favorite(owner.id, "r-dal");
    db.insert_favorite(&saved).await.expect("save favorite");
    db.insert_favorite(&test_favorite(other.id, "r-naan"))
        .await
        .expect("save other favorite");

    let favorites = db.list_favorites(owner.id).await.expect("list");

    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, saved.id);
    assert_eq!(favorites[0].user_id, owner.id);
    assert_eq!(favorites[0].recipe_id, "r-dal");
}

#[tokio::test]
async fn test_duplicate_recipe_favorites_are_permitted() {
    require_emulator!();
    let db = common::test_db().await;

    let owner = test_user(unique_external_id());
    db.insert_user(&owner).await.expect("insert owner");

    db.insert_favorite(&test_favorite(owner.id, "r-dal"))
        .await
        .expect("first save");
    db.insert_favorite(&test_favorite(owner.id, "r-dal"))
        .await
        .expect("second save of the same recipe");

    let favorites = db.list_favorites(owner.id).await.expect("list");
    assert_eq!(favorites.len(), 2);
}

// ─── OAuth State ─────────────────────────────────────────────

#[tokio::test]
async fn test_oauth_state_store_roundtrip() {
    require_emulator!();
    let db = common::test_db().await;

    let token = Uuid::new_v4().simple().to_string();
    db.insert_oauth_state(&OAuthState {
        state: token.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    })
    .await
    .expect("insert state");

    assert!(db.get_oauth_state(&token).await.expect("get").is_some());

    db.delete_oauth_state(&token).await.expect("delete");
    assert!(db.get_oauth_state(&token).await.expect("get").is_none());
}

#[tokio::test]
async fn test_callback_consumes_state_exactly_once() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;

    let token = Uuid::new_v4().simple().to_string();

    // Initiate login with a caller-chosen state
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/auth?state={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .unwrap();
    assert!(location.starts_with("https://github.com/login/oauth/authorize"));
    assert!(location.contains(&token));

    // First callback validates and forwards
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/auth/callback?code=abc123&state={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .unwrap();
    assert!(location.contains("code=abc123"));

    // Replaying the same state must fail - it was consumed
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/auth/callback?code=abc123&state={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_rejects_never_issued_state() {
    require_emulator!();
    let (app, _) = common::create_emulator_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/callback?code=abc123&state=never-issued")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_rejects_expired_state() {
    require_emulator!();
    let (app, state) = common::create_emulator_app().await;

    let token = Uuid::new_v4().simple().to_string();
    let stale =
        chrono::Utc::now() - chrono::Duration::seconds(OAuthState::TTL_SECS + 60);
    state
        .db
        .insert_oauth_state(&OAuthState {
            state: token.clone(),
            created_at: stale.to_rfc3339(),
        })
        .await
        .expect("insert stale state");

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/auth/callback?code=abc123&state={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
