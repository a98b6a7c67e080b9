//! Shared helpers for API integration tests.
//!
//! The router is built exactly as in production via `build_app_router`, but
//! over a lazy pool so tests that never touch the database (auth rejection,
//! validation, drafts, health shape) run without PostgreSQL.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;

use memoria_api::auth::jwt::{generate_access_token, JwtConfig};
use memoria_api::config::ServerConfig;
use memoria_api::router::build_app_router;
use memoria_api::state::AppState;
use memoria_api::storage::{LocalObjectStore, ObjectStore};
use memoria_core::memorial::ModerationMode;
use memoria_core::types::DbId;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-with-plenty-of-entropy";

/// A fully wired test application. The temp dirs live as long as the app.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    _media: TempDir,
    _drafts: TempDir,
}

/// Build a test `ServerConfig` rooted in throwaway directories.
pub fn test_config(media: &TempDir, drafts: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root: media.path().to_path_buf(),
        media_base_url: "/media".to_string(),
        draft_dir: drafts.path().to_path_buf(),
        moderation: ModerationMode::AutoApprove,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        },
    }
}

/// Build the full application router with the production middleware stack.
///
/// The pool is lazy: no connection is attempted until a handler actually
/// queries, so DB-free endpoints work without a running PostgreSQL.
pub fn build_test_app() -> TestApp {
    let media = TempDir::new().expect("media tempdir");
    let store = Arc::new(LocalObjectStore::new(media.path()));
    build_test_app_inner(media, store)
}

/// Same as [`build_test_app`], but with the blob store swapped out, e.g. a
/// fault-injecting store for failure-path tests.
#[allow(dead_code)]
pub fn build_test_app_with_store(store: Arc<dyn ObjectStore>) -> TestApp {
    let media = TempDir::new().expect("media tempdir");
    build_test_app_inner(media, store)
}

fn build_test_app_inner(media: TempDir, store: Arc<dyn ObjectStore>) -> TestApp {
    let drafts = TempDir::new().expect("drafts tempdir");
    let config = test_config(&media, &drafts);

    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/memoria_test".to_string());
    let pool = PgPoolOptions::new()
        .connect_lazy(&url)
        .expect("lazy pool from URL");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store,
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        _media: media,
        _drafts: drafts,
    }
}

/// Connect to the database named by `DATABASE_URL` and run migrations.
/// Tests that need real rows return early when the variable is absent.
#[allow(dead_code)]
pub async fn test_pool() -> Option<memoria_db::DbPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = memoria_db::create_pool(&url)
        .await
        .expect("connect to test database");
    memoria_db::run_migrations(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

/// Bearer token for an arbitrary user id, signed with the test secret.
pub fn bearer(config: &ServerConfig, user_id: DbId) -> String {
    let token =
        generate_access_token(user_id, "user", &config.jwt).expect("token generation");
    format!("Bearer {token}")
}

/// Convenience JSON request builder.
pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}
