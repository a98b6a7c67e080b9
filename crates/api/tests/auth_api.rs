//! Authentication and authorization behavior at the HTTP layer.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let app = common::build_test_app();

    for (method, uri) in [
        ("GET", "/api/v1/me"),
        ("GET", "/api/v1/me/memorials"),
        ("GET", "/api/v1/me/dashboard/stats"),
        ("GET", "/api/v1/me/draft"),
        ("GET", "/api/v1/me/searches"),
        ("POST", "/api/v1/memorials/preview"),
    ] {
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require auth"
        );
        let body = body_json(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn malformed_bearer_token_is_rejected() {
    let app = common::build_test_app();

    for auth in ["Basic abc", "Bearer not-a-jwt", "Bearer "] {
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/me/draft")
                    .header(header::AUTHORIZATION, auth)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "header {auth:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn draft_round_trips_over_http() {
    let app = common::build_test_app();
    let auth = common::bearer(&app.config, 7);

    // No draft yet.
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/me/draft")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::Value::Null);

    // Save one.
    let form = serde_json::json!({
        "full_name": "Eleanor Ruth Hastings",
        "biography": "Forty years of teaching.",
    });
    let response = app
        .router
        .clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/v1/me/draft",
            Some(&auth),
            &form.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Owner gets it back.
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/me/draft")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["form"]["full_name"], "Eleanor Ruth Hastings");
    assert_eq!(body["user_id"], 7);
    assert!(body["last_saved"].is_string());

    // A different user sees nothing.
    let other = common::bearer(&app.config, 8);
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/me/draft")
                .header(header::AUTHORIZATION, &other)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await, serde_json::Value::Null);

    // Clear is idempotent.
    for _ in 0..2 {
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/me/draft")
                    .header(header::AUTHORIZATION, &auth)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
