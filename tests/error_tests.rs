// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{http::StatusCode, response::IntoResponse};
use stride_tracker::error::AppError;

#[test]
fn test_is_strava_token_error_matches() {
    let err = AppError::StravaApi(AppError::STRAVA_TOKEN_ERROR.to_string());
    assert!(err.is_strava_token_error());
}

#[test]
fn test_is_strava_token_error_no_match() {
    let err = AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::StravaApi("Internal Server Error".to_string());
    assert!(!err.is_strava_token_error());

    // Request errors whose body happens to mention tokens or invalid fields
    let err = AppError::StravaApi(
        r#"HTTP 400 Bad Request: {"errors":[{"resource":"Activity","code":"invalid"}]}"#
            .to_string(),
    );
    assert!(!err.is_strava_token_error());

    let err = AppError::StravaApi("Token expired".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::BadRequest("Bad Request".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::UpstreamAuth("invalid code".to_string());
    assert!(!err.is_strava_token_error());
}

#[test]
fn test_error_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
        (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
        (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
        (AppError::UpstreamAuth("x".to_string()), StatusCode::BAD_GATEWAY),
        (AppError::StravaApi("x".to_string()), StatusCode::BAD_GATEWAY),
        (
            AppError::Internal(anyhow::anyhow!("x")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}
