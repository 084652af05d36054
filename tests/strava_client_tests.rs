// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava token lifecycle and upstream failure handling.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use stride_tracker::AppState;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::strava_activity;

async fn get(app: Router, state: &AppState, uri: &str) -> (StatusCode, Value) {
    let token = common::create_test_jwt(common::ATHLETE_ID, &state.config.jwt_signing_key);
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, common::body_json(response).await)
}

async fn mock_empty_history_for(strava: &MockServer, access_token: &str) {
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(header_eq("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(strava)
        .await;
}

fn refreshed_tokens() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "token_type": "Bearer",
        "access_token": "access-2",
        "refresh_token": "refresh-2",
        "expires_at": 4102444800i64,
        "expires_in": 21600
    }))
}

#[tokio::test]
async fn test_expiring_token_is_refreshed_before_use() {
    let strava = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-4242"))
        .respond_with(refreshed_tokens())
        .expect(1)
        .mount(&strava)
        .await;
    mock_empty_history_for(&strava, "access-2").await;

    let (app, state) = common::create_test_app_with_strava(&strava.uri());
    // Inside the five minute refresh margin
    common::seed_tokens(&state, common::ATHLETE_ID, "access-1", 60);

    let (status, _) = get(app, &state, "/api/records").await;

    assert_eq!(status, StatusCode::OK);
    let tokens = state.db.get_tokens(common::ATHLETE_ID).unwrap();
    assert_eq!(tokens.access_token, "access-2");
    assert_eq!(tokens.refresh_token, "refresh-2");
}

#[tokio::test]
async fn test_rejected_token_is_refreshed_and_retried_once() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(header_eq("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Authorization Error"
        })))
        .expect(1)
        .mount(&strava)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(refreshed_tokens())
        .expect(1)
        .mount(&strava)
        .await;
    mock_empty_history_for(&strava, "access-2").await;

    let (app, state) = common::create_test_app_with_strava(&strava.uri());
    common::seed_tokens(&state, common::ATHLETE_ID, "access-1", 3600);

    let (status, body) = get(app, &state, "/api/progression").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weeks"], json!([]));
    assert_eq!(
        state.db.get_tokens(common::ATHLETE_ID).unwrap().access_token,
        "access-2"
    );
}

#[tokio::test]
async fn test_revoked_refresh_token_requires_login() {
    let strava = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Authorization Error"
        })))
        .mount(&strava)
        .await;

    let (app, state) = common::create_test_app_with_strava(&strava.uri());
    common::seed_tokens(&state, common::ATHLETE_ID, "access-1", -60);

    let (status, body) = get(app, &state, "/api/badges").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_bad_request_does_not_refresh_token() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Bad Request",
            "errors": [{"resource": "Application", "field": "per_page", "code": "invalid"}]
        })))
        .expect(1)
        .mount(&strava)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(refreshed_tokens())
        .expect(0)
        .mount(&strava)
        .await;

    let (app, state) = common::create_test_app_with_strava(&strava.uri());
    common::seed_tokens(&state, common::ATHLETE_ID, "access-1", 3600);

    let (status, body) = get(app, &state, "/api/records").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "strava_error");
    assert_eq!(
        state.db.get_tokens(common::ATHLETE_ID).unwrap().access_token,
        "access-1"
    );
}

#[tokio::test]
async fn test_rate_limit_is_bad_gateway() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&strava)
        .await;

    let (app, state) = common::create_test_app_with_strava(&strava.uri());
    common::seed_tokens(&state, common::ATHLETE_ID, "access-1", 3600);

    let (status, body) = get(app, &state, "/api/records").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "strava_error");
    assert_eq!(body["details"], "Rate limit exceeded");
}

#[tokio::test]
async fn test_activity_detail_without_streams() {
    let strava = MockServer::start().await;

    let mut activity = strava_activity(9, "Run", "2024-05-05T07:00:00Z", 2_000.0, 600, 12.0);
    activity["average_heartrate"] = json!(150.4);
    activity["splits_metric"] = json!([
        {"distance": 1000.0, "moving_time": 290},
        {"distance": 1000.0, "moving_time": 310}
    ]);

    Mock::given(method("GET"))
        .and(path("/activities/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity))
        .mount(&strava)
        .await;
    Mock::given(method("GET"))
        .and(path("/activities/9/streams"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&strava)
        .await;

    let (app, state) = common::create_test_app_with_strava(&strava.uri());
    common::seed_tokens(&state, common::ATHLETE_ID, "access-1", 3600);

    let (status, body) = get(app, &state, "/api/activities/9").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 9);
    assert_eq!(body["pace"], "5:00");
    assert_eq!(body["average_heart_rate"], 150);
    assert!(body["elevation_profile"].is_null());
    assert!(body["heart_rate"].is_null());

    let splits = body["splits"].as_array().unwrap();
    assert_eq!(splits.len(), 2);
    assert_eq!(splits[0]["effort"], "fast");
    assert_eq!(splits[1]["effort"], "slow");
}

#[tokio::test]
async fn test_activity_detail_with_streams() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/activities/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(strava_activity(
            9,
            "Run",
            "2024-05-05T07:00:00Z",
            2_000.0,
            600,
            12.0,
        )))
        .mount(&strava)
        .await;
    Mock::given(method("GET"))
        .and(path("/activities/9/streams"))
        .and(query_param("key_by_type", "true"))
        .and(query_param("keys", "distance,altitude,heartrate,time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "distance": {"data": [0.0, 1000.0, 2000.0], "series_type": "distance"},
            "time": {"data": [0.0, 300.0, 600.0], "series_type": "distance"},
            "altitude": {"data": [10.0, 14.0, 12.0], "series_type": "distance"},
            "heartrate": {"data": [120.0, 150.0, 160.0], "series_type": "distance"}
        })))
        .mount(&strava)
        .await;

    let (app, state) = common::create_test_app_with_strava(&strava.uri());
    common::seed_tokens(&state, common::ATHLETE_ID, "access-1", 3600);

    let (status, body) = get(app, &state, "/api/activities/9").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["splits"].as_array().unwrap().len(), 2);
    assert_eq!(body["elevation_profile"]["labels"], json!([0.0, 1.0, 2.0]));
    assert_eq!(body["heart_rate"]["labels"], json!([0.0, 5.0, 10.0]));
    assert_eq!(body["heart_rate"]["values"], json!([120.0, 150.0, 160.0]));
}

#[tokio::test]
async fn test_unknown_activity_is_not_found() {
    let strava = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/activities/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&strava)
        .await;

    let (app, state) = common::create_test_app_with_strava(&strava.uri());
    common::seed_tokens(&state, common::ATHLETE_ID, "access-1", 3600);

    let (status, body) = get(app, &state, "/api/activities/404").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
