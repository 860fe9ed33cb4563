//! Common test utilities for integration tests.
//!
//! Integration tests run against a real PostgreSQL database named by
//! `TEST_DATABASE_URL`. When it is not set, [`test_pool`] returns `None`
//! and the calling test returns early.
//!
//! Tests share the database and run in parallel, so every fixture uses
//! unique names and reports are always filtered to the fixture's user.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;

use activity_dashboard_api::{app::create_app, config::Config};

/// Connect to the test database and apply migrations.
pub async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping integration test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    run_migrations(&pool).await;
    Some(pool)
}

/// Apply the shipped migrations. Concurrent callers are serialized by sqlx.
pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("../persistence/src/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
}

pub fn test_config() -> Config {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_default();
    Config::load_for_test(&[("database.url", url.as_str())]).expect("Failed to build test config")
}

pub fn create_test_app(pool: PgPool) -> Router {
    create_app(test_config(), pool)
}

/// Short random suffix for unique fixture names.
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Insert a monitored user and return its id.
pub async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, status) VALUES ($1, $2, 'active') RETURNING id",
    )
    .bind(name)
    .bind(format!("{}_{}@example.com", name.to_lowercase(), unique_suffix()))
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

/// Session times in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionTimes {
    pub productive: i64,
    pub wasted: i64,
    pub neutral: i64,
    pub idle: i64,
    pub break_time: i64,
}

impl SessionTimes {
    pub fn total(&self) -> i64 {
        self.productive + self.wasted + self.neutral + self.idle + self.break_time
    }
}

/// Insert a session starting at `start` and lasting its total time.
pub async fn seed_session(
    pool: &PgPool,
    user_id: i64,
    start: DateTime<Utc>,
    times: SessionTimes,
) -> i64 {
    let end = start + chrono::Duration::seconds(times.total());
    sqlx::query_scalar(
        r#"
        INSERT INTO stealth_sessions
            (user_id, total_time, productive_time, wasted_time, neutral_time,
             idle_time, break_time, created_at, last_updated, date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(times.total())
    .bind(times.productive)
    .bind(times.wasted)
    .bind(times.neutral)
    .bind(times.idle)
    .bind(times.break_time)
    .bind(start)
    .bind(end)
    .bind(start.date_naive())
    .fetch_one(pool)
    .await
    .expect("Failed to seed session")
}

pub async fn seed_usage(pool: &PgPool, session_id: i64, app: &str, category: &str, seconds: i64) {
    sqlx::query(
        "INSERT INTO session_usage_breakdown (session_id, domain_or_app, category, time_spent) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(session_id)
    .bind(app)
    .bind(category)
    .bind(seconds)
    .execute(pool)
    .await
    .expect("Failed to seed usage");
}

pub async fn seed_unregistered_session(
    pool: &PgPool,
    device_id: Option<&str>,
    windows_username: Option<&str>,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO unregistered_sessions
            (device_id, windows_username, hostname, first_seen, last_seen, total_time)
        VALUES ($1, $2, 'WS-TEST', NOW() - INTERVAL '1 hour', NOW(), 3600)
        RETURNING id
        "#,
    )
    .bind(device_id)
    .bind(windows_username)
    .fetch_one(pool)
    .await
    .expect("Failed to seed unregistered session")
}

/// Remove a user and, by cascade, everything attached to it.
pub async fn cleanup_user(pool: &PgPool, user_id: i64) {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .ok();
}
