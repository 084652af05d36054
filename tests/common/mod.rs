// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use chrono::{Duration, Utc};
use std::sync::Arc;
use stride_tracker::config::Config;
use stride_tracker::db::MemoryDb;
use stride_tracker::middleware::auth::create_jwt;
use stride_tracker::models::TokenBundle;
use stride_tracker::routes::create_router;
use stride_tracker::services::{StravaClient, StravaService};
use stride_tracker::AppState;

/// Athlete ID used by most tests.
#[allow(dead_code)]
pub const ATHLETE_ID: u64 = 4242;

/// Build the app around `config`.
/// Returns the router and the shared state.
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let db = MemoryDb::new();
    let strava_service = StravaService::new(StravaClient::from_config(&config), db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        strava_service,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with the default test config (no Strava reachable).
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Create a test app whose Strava API and OAuth endpoints point at `strava_uri`.
#[allow(dead_code)]
pub fn create_test_app_with_strava(strava_uri: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.strava_api_url = strava_uri.to_string();
    config.strava_oauth_url = strava_uri.to_string();
    create_test_app_with_config(config)
}

/// Create a test app serving a specific frontend URL.
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_with_config(config)
}

/// Session JWT for `athlete_id`.
#[allow(dead_code)]
pub fn create_test_jwt(athlete_id: u64, signing_key: &[u8]) -> String {
    create_jwt(athlete_id, signing_key).unwrap()
}

/// Store a Strava token bundle valid for the next `expires_in_secs`.
#[allow(dead_code)]
pub fn seed_tokens(state: &AppState, athlete_id: u64, access_token: &str, expires_in_secs: i64) {
    state.db.set_tokens(
        athlete_id,
        TokenBundle {
            access_token: access_token.to_string(),
            refresh_token: format!("refresh-{athlete_id}"),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        },
    );
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Minimal Strava activity list entry.
#[allow(dead_code)]
pub fn strava_activity(
    id: u64,
    activity_type: &str,
    start_date: &str,
    distance: f64,
    moving_time: u64,
    elevation: f64,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Activity {id}"),
        "type": activity_type,
        "distance": distance,
        "moving_time": moving_time,
        "start_date": start_date,
        "total_elevation_gain": elevation,
    })
}
