// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for reading athlete activity history.
//!
//! Handles:
//! - Paginated activity listing
//! - Activity detail and stream fetching
//! - OAuth code exchange and token refresh
//! - Rate limit and expired-token detection

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ActivityRecord, ActivityStreams, StravaActivity};
use serde::Deserialize;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials and base URLs.
    pub fn new(
        client_id: String,
        client_secret: String,
        api_url: String,
        oauth_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            oauth_url,
            client_id,
            client_secret,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
            config.strava_api_url.clone(),
            config.strava_oauth_url.clone(),
        )
    }

    /// One page of the athlete's activities, newest first.
    ///
    /// An empty page means there is nothing further back.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Get a detailed activity (with metric splits) by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<StravaActivity, AppError> {
        let url = format!("{}/activities/{}", self.api_url, activity_id);
        self.get_json(&url, access_token).await
    }

    /// Get the requested streams for an activity, keyed by stream type.
    pub async fn get_activity_streams(
        &self,
        access_token: &str,
        activity_id: u64,
        keys: &[&str],
    ) -> Result<ActivityStreams, AppError> {
        let url = format!("{}/activities/{}/streams", self.api_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("keys", keys.join(",")), ("key_by_type", "true".to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Exchange an authorization code for tokens and the athlete profile.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::UpstreamAuth(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::UpstreamAuth(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UpstreamAuth(format!("Failed to parse token response: {}", e)))
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            if status.as_u16() == 404 {
                return Err(AppError::NotFound("Strava resource".to_string()));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub athlete: Athlete,
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

use crate::db::MemoryDb;
use crate::models::{Athlete, TokenBundle};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Shared refresh locks type.
pub type RefreshLocks = Arc<DashMap<u64, Arc<Mutex<()>>>>;

/// High-level Strava service that manages the token lifecycle and API calls.
///
/// This service encapsulates:
/// - Token lookup in the in-memory store
/// - Automatic refresh when a token is within 5 minutes of expiry
/// - One forced refresh and retry when Strava rejects a token
/// - Per-athlete locking so concurrent requests refresh only once
/// - History pagination
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    db: MemoryDb,
    /// Per-athlete mutex to serialize token refresh operations.
    refresh_locks: RefreshLocks,
}

impl StravaService {
    pub fn new(client: StravaClient, db: MemoryDb) -> Self {
        Self {
            client,
            db,
            refresh_locks: Arc::new(DashMap::new()),
        }
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Get a valid (non-expiring) access token for the given athlete.
    ///
    /// 1. Return the stored token if it is outside the refresh margin
    /// 2. Otherwise take the per-athlete lock and re-check, since another
    ///    task may have refreshed while we waited
    /// 3. Refresh with Strava and store the new bundle
    pub async fn get_valid_access_token(&self, athlete_id: u64) -> Result<String, AppError> {
        let tokens = self.stored_tokens(athlete_id)?;
        if !needs_refresh(&tokens, Utc::now()) {
            return Ok(tokens.access_token);
        }

        self.refresh_locked(athlete_id, |current| needs_refresh(current, Utc::now()))
            .await
    }

    /// Refresh after Strava rejected `rejected_token`, unless another task
    /// has already replaced it.
    async fn refresh_rejected(
        &self,
        athlete_id: u64,
        rejected_token: &str,
    ) -> Result<String, AppError> {
        self.refresh_locked(athlete_id, |current| {
            current.access_token == rejected_token
        })
        .await
    }

    async fn refresh_locked<F>(&self, athlete_id: u64, should_refresh: F) -> Result<String, AppError>
    where
        F: Fn(&TokenBundle) -> bool,
    {
        let lock = self
            .refresh_locks
            .entry(athlete_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let _guard = lock.lock().await;

        let tokens = self.stored_tokens(athlete_id)?;
        if !should_refresh(&tokens) {
            return Ok(tokens.access_token);
        }

        tracing::info!(athlete_id, "Refreshing Strava access token");

        let refreshed = match self.client.refresh_token(&tokens.refresh_token).await {
            Ok(t) => t,
            Err(e) if e.is_strava_token_error() => {
                tracing::warn!(athlete_id, "Strava rejected refresh token");
                return Err(AppError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        let bundle = TokenBundle {
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token,
            expires_at: DateTime::from_timestamp(refreshed.expires_at, 0).unwrap_or_default(),
        };
        let access_token = bundle.access_token.clone();
        self.db.set_tokens(athlete_id, bundle);

        tracing::info!(athlete_id, "Token refreshed and stored");
        Ok(access_token)
    }

    fn stored_tokens(&self, athlete_id: u64) -> Result<TokenBundle, AppError> {
        self.db.get_tokens(athlete_id).ok_or_else(|| {
            tracing::debug!(athlete_id, "No stored Strava tokens");
            AppError::Unauthorized
        })
    }

    /// Run `call` with a valid token; if Strava rejects it, refresh once and
    /// retry.
    async fn with_access_token<T, F, Fut>(&self, athlete_id: u64, call: F) -> Result<T, AppError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let access_token = self.get_valid_access_token(athlete_id).await?;
        match call(access_token.clone()).await {
            Err(e) if e.is_strava_token_error() => {
                tracing::info!(athlete_id, "Strava rejected access token, retrying after refresh");
                let fresh = self.refresh_rejected(athlete_id, &access_token).await?;
                call(fresh).await
            }
            other => other,
        }
    }

    // ─── OAuth Callback Handling ─────────────────────────────────────────────

    /// Handle OAuth callback: exchange code for tokens, store athlete and tokens.
    pub async fn handle_oauth_callback(&self, code: &str) -> Result<Athlete, AppError> {
        let exchange = self.client.exchange_code(code).await?;

        let athlete = exchange.athlete;
        let expires_at = DateTime::<Utc>::from_timestamp(exchange.expires_at, 0)
            .unwrap_or_else(Utc::now);

        self.db.set_tokens(
            athlete.id,
            TokenBundle {
                access_token: exchange.access_token,
                refresh_token: exchange.refresh_token,
                expires_at,
            },
        );
        self.db.upsert_athlete(athlete.clone());

        tracing::info!(
            athlete_id = athlete.id,
            firstname = %athlete.firstname,
            "OAuth callback handled, athlete and tokens stored"
        );

        Ok(athlete)
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Fetch the athlete's history, page by page, until an empty page or
    /// `max_pages` pages.
    pub async fn fetch_activities(
        &self,
        athlete_id: u64,
        per_page: u32,
        max_pages: u32,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        let mut activities = Vec::new();

        for page in 1..=max_pages {
            let batch = self.list_activities(athlete_id, page, per_page).await?;
            if batch.is_empty() {
                break;
            }
            tracing::debug!(athlete_id, page, count = batch.len(), "Fetched activity page");
            activities.extend(batch.into_iter().map(ActivityRecord::from));
        }

        Ok(activities)
    }

    /// One page of activities.
    pub async fn list_activities(
        &self,
        athlete_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>, AppError> {
        let client = &self.client;
        self.with_access_token(athlete_id, |token| async move {
            client.list_activities(&token, page, per_page).await
        })
        .await
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        athlete_id: u64,
        activity_id: u64,
    ) -> Result<StravaActivity, AppError> {
        let client = &self.client;
        self.with_access_token(athlete_id, |token| async move {
            client.get_activity(&token, activity_id).await
        })
        .await
    }

    /// Get streams for an activity.
    pub async fn get_activity_streams(
        &self,
        athlete_id: u64,
        activity_id: u64,
        keys: &[&str],
    ) -> Result<ActivityStreams, AppError> {
        let client = &self.client;
        self.with_access_token(athlete_id, |token| async move {
            client.get_activity_streams(&token, activity_id, keys).await
        })
        .await
    }
}

fn needs_refresh(tokens: &TokenBundle, now: DateTime<Utc>) -> bool {
    now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) >= tokens.expires_at
}
