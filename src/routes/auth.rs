// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Redirect,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_jwt, session_cookie, session_cookie_removal, verify_jwt, SESSION_COOKIE,
};
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Scopes requested from Strava. Private activities count towards the metrics.
const OAUTH_SCOPE: &str = "read,activity:read_all";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/strava", get(auth_start))
        .route("/auth/strava/callback", get(auth_callback))
        .route("/auth/logout", post(logout))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after OAuth completes.
    /// If not provided, uses FRONTEND_URL env var.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start OAuth flow - redirect to Strava authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    let oauth_state = sign_state(&frontend_url, timestamp, &state.config.oauth_state_key)?;

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");
    let callback_url = format!("{}/auth/strava/callback", service_url(host));

    let auth_url = format!(
        "{}/authorize?\
         client_id={}&\
         redirect_uri={}&\
         response_type=code&\
         scope={}&\
         state={}",
        state.config.strava_oauth_url,
        state.config.strava_client_id,
        urlencoding::encode(&callback_url),
        OAUTH_SCOPE,
        oauth_state
    );

    tracing::info!(
        client_id = %state.config.strava_client_id,
        frontend_url = %frontend_url,
        "Starting OAuth flow, redirecting to Strava"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, create session.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let frontend_url = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key))
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Strava");
        let redirect = format!("{}?error={}", frontend_url, urlencoding::encode(&error));
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let Some(code) = params.code else {
        tracing::warn!("OAuth callback without authorization code");
        return Ok((
            jar,
            Redirect::temporary(&format!("{}?error=missing_code", frontend_url)),
        ));
    };

    tracing::info!("Exchanging authorization code for tokens");

    let athlete = state.strava_service.handle_oauth_callback(&code).await?;

    tracing::info!(
        athlete_id = athlete.id,
        firstname = %athlete.firstname,
        "OAuth successful, athlete and tokens stored"
    );

    let jwt = create_jwt(athlete.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let jar = jar.add(session_cookie(jwt, state.config.secure_cookies()));

    Ok((jar, Redirect::temporary(&frontend_url)))
}

/// Scheme and host this API is reachable at.
fn service_url(host: &str) -> String {
    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };
    format!("{}://{}", scheme, host)
}

/// Build the signed OAuth state: base64("frontend_url|timestamp_hex|signature_hex").
fn sign_state(frontend_url: &str, timestamp: u128, secret: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify HMAC signature and decode the frontend URL from the OAuth state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Split from the right: the frontend URL itself may contain '|'.
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let frontend_url = parts.next()?;

    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if !bool::from(signature_hex.as_bytes().ct_eq(expected_signature.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

/// Logout - forget the athlete's Strava tokens and clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let user = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| verify_jwt(cookie.value(), &state.config.jwt_signing_key).ok());

    if let Some(user) = user {
        let removed = state.db.delete_tokens(user.athlete_id);
        tracing::info!(athlete_id = user.athlete_id, removed, "Logged out");
    }

    let jar = jar.remove(session_cookie_removal(state.config.secure_cookies()));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"secret_key";

    #[test]
    fn test_verify_and_decode_state_success() {
        let frontend_url = "https://example.com";
        let encoded_state = sign_state(frontend_url, 1234567890, SECRET).unwrap();

        let result = verify_and_decode_state(&encoded_state, SECRET);
        assert_eq!(result, Some(frontend_url.to_string()));
    }

    #[test]
    fn test_verify_and_decode_state_url_with_query() {
        let frontend_url = "http://localhost:5173/plan?tab=week";
        let encoded_state = sign_state(frontend_url, 1, SECRET).unwrap();

        assert_eq!(
            verify_and_decode_state(&encoded_state, SECRET),
            Some(frontend_url.to_string())
        );
    }

    #[test]
    fn test_verify_and_decode_state_invalid_signature() {
        let payload = format!("{}|{:x}", "https://example.com", 1234567890u128);
        let state_data = format!("{}|{}", payload, "invalid_signature");
        let encoded_state = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        assert_eq!(verify_and_decode_state(&encoded_state, SECRET), None);
    }

    #[test]
    fn test_verify_and_decode_state_wrong_secret() {
        let encoded_state = sign_state("https://example.com", 1234567890, SECRET).unwrap();
        assert_eq!(verify_and_decode_state(&encoded_state, b"wrong_key"), None);
    }

    #[test]
    fn test_verify_and_decode_state_tampered_url() {
        let encoded_state = sign_state("https://example.com", 1234567890, SECRET).unwrap();
        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(&encoded_state).unwrap()).unwrap();
        let tampered = decoded.replace("example.com", "evil.example");

        assert_eq!(
            verify_and_decode_state(&URL_SAFE_NO_PAD.encode(tampered.as_bytes()), SECRET),
            None
        );
    }

    #[test]
    fn test_verify_and_decode_state_malformed() {
        let encoded_state = URL_SAFE_NO_PAD.encode("invalid|format");
        assert_eq!(verify_and_decode_state(&encoded_state, SECRET), None);
        assert_eq!(verify_and_decode_state("not base64 !!", SECRET), None);
    }

    #[test]
    fn test_service_url_scheme() {
        assert_eq!(service_url("localhost:8080"), "http://localhost:8080");
        assert_eq!(service_url("127.0.0.1:3000"), "http://127.0.0.1:3000");
        assert_eq!(service_url("api.stride.run"), "https://api.stride.run");
    }
}
