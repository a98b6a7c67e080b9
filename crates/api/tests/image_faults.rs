//! Failure-path behavior at the blob-store seam, driven through the full
//! router with a store whose removals always fail.
//!
//! These tests need real rows, so they run only when `DATABASE_URL` is set.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tower::ServiceExt;

use memoria_api::storage::ObjectStore;
use memoria_core::error::CoreError;
use memoria_db::models::image::CreateMemorialImage;
use memoria_db::models::memorial::CreateMemorial;
use memoria_db::models::user::CreateUserProfile;
use memoria_db::repositories::{ImageRepo, MemorialRepo, UserRepo};
use memoria_db::DbPool;

/// A store whose removals always fail, as if the backing volume vanished.
#[derive(Debug)]
struct BrokenRemovalStore;

#[async_trait]
impl ObjectStore for BrokenRemovalStore {
    async fn put(&self, _key: &str, _bytes: &[u8]) -> Result<(), CoreError> {
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        Err(CoreError::Storage(format!("Simulated outage removing '{key}'")))
    }
}

async fn seed_memorial_with_image(
    pool: &DbPool,
) -> (
    memoria_db::models::user::UserProfile,
    memoria_db::models::memorial::Memorial,
    memoria_db::models::image::MemorialImage,
) {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let user = UserRepo::create(
        pool,
        &CreateUserProfile {
            email: format!("owner-{tag}@example.com"),
            password_hash: "$argon2id$test-hash".to_string(),
            full_name: "Test Owner".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .expect("create user");

    let memorial = MemorialRepo::create(
        pool,
        &CreateMemorial {
            created_by: user.id,
            full_name: "Fault Case".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1940, 3, 14).unwrap(),
            death_date: NaiveDate::from_ymd_opt(2020, 11, 2).unwrap(),
            birth_location: String::new(),
            resting_place: String::new(),
            relationship: String::new(),
            biography: "A long and generous life devoted to family and the garden."
                .to_string(),
            occupation: String::new(),
            hobbies: String::new(),
            favorite_quote: String::new(),
            template: "classic".to_string(),
            privacy: "public".to_string(),
        },
    )
    .await
    .expect("create memorial");

    // The URL lives under the test media base so the handler derives a
    // storage key and actually calls the store.
    let image = ImageRepo::create(
        pool,
        &CreateMemorialImage {
            memorial_id: memorial.id,
            image_url: format!("/media/memorials/{}/{tag}.png", memorial.id),
            caption: None,
            is_primary: true,
        },
    )
    .await
    .expect("create image");

    (user, memorial, image)
}

#[tokio::test]
async fn image_row_survives_a_failed_blob_removal() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let (user, memorial, image) = seed_memorial_with_image(&pool).await;

    let app = common::build_test_app_with_store(Arc::new(BrokenRemovalStore));
    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!(
                    "/api/v1/memorials/{}/images/{}",
                    memorial.id, image.id
                ))
                .header(header::AUTHORIZATION, common::bearer(&app.config, user.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "STORAGE_ERROR");

    // The blob goes first and its removal failed, so the row must remain:
    // the gallery keeps pointing at an existing blob.
    assert!(ImageRepo::find_by_id(&pool, image.id)
        .await
        .expect("find image")
        .is_some());
}

#[tokio::test]
async fn memorial_delete_succeeds_despite_blob_cleanup_failure() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let (user, memorial, _image) = seed_memorial_with_image(&pool).await;

    let app = common::build_test_app_with_store(Arc::new(BrokenRemovalStore));
    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/memorials/{}", memorial.id))
                .header(header::AUTHORIZATION, common::bearer(&app.config, user.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Blob cleanup after a memorial delete is best-effort: a leaked blob is
    // recoverable, a half-deleted memorial is not.
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(MemorialRepo::find_by_id(&pool, memorial.id)
        .await
        .expect("find memorial")
        .is_none());
}
