// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated athletes.
//!
//! Metric endpoints refetch the athlete's history on every call and run the
//! analytics engines over it; nothing derived is stored.

use crate::analytics::program::{build_plan_view, suggest_program, PlanView, ProgramSuggestion};
use crate::analytics::streaks::compute_streaks_with_order;
use crate::analytics::{
    compute_badges, compute_predictions, compute_records, compute_weekly_aggregates,
};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::stats::RacePredictions;
use crate::models::training::DayKeyError;
use crate::models::{
    ActivityRecord, BadgeBoard, DayKey, PersonalRecords, StreakSummary, WeeklySummary,
};
use crate::services::{ActivityDetail, ActivityService, ActivitySummary};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/activities", get(get_activities))
        .route("/api/activities/{id}", get(get_activity_detail))
        .route("/api/progression", get(get_progression))
        .route("/api/records", get(get_records))
        .route("/api/predictions", get(get_predictions))
        .route("/api/badges", get(get_badges))
        .route("/api/program", get(get_program))
        .route("/api/plan", get(get_plan))
        .route("/api/plan/toggle", post(toggle_plan_session))
}

fn validate<T: Validate>(params: &T) -> Result<()> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ─── Athlete Profile ─────────────────────────────────────────

/// Current athlete response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub athlete_id: u64,
    pub firstname: String,
    pub lastname: String,
    pub profile_picture: Option<String>,
}

/// Get current athlete profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let athlete = state.db.get_athlete(user.athlete_id).ok_or_else(|| {
        AppError::NotFound(format!("Athlete {} not found", user.athlete_id))
    })?;

    Ok(Json(MeResponse {
        athlete_id: athlete.id,
        firstname: athlete.firstname,
        lastname: athlete.lastname,
        profile_picture: athlete.profile,
    }))
}

// ─── Activities ──────────────────────────────────────────────

fn default_limit() -> u32 {
    10
}

#[derive(Deserialize, Validate)]
struct ActivitiesQuery {
    /// Number of most recent activities to return
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 200))]
    limit: u32,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivitySummary>,
    pub limit: u32,
}

/// Most recent activities, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    validate(&params)?;
    let limit = params.limit;

    tracing::debug!(athlete_id = user.athlete_id, limit, "Fetching recent activities");

    let activities = ActivityService::new(&state.strava_service, &state.config)
        .recent_summaries(user.athlete_id, limit)
        .await?;

    Ok(Json(ActivitiesResponse { activities, limit }))
}

/// One activity with splits and chart series.
async fn get_activity_detail(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
) -> Result<Json<ActivityDetail>> {
    let detail = ActivityService::new(&state.strava_service, &state.config)
        .activity_detail(user.athlete_id, activity_id)
        .await?;

    Ok(Json(detail))
}

// ─── Metrics ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProgressionResponse {
    pub weeks: Vec<WeeklySummary>,
}

async fn get_progression(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgressionResponse>> {
    let activities = load_activities(&state, user).await?;
    Ok(Json(ProgressionResponse {
        weeks: compute_weekly_aggregates(&activities),
    }))
}

async fn get_records(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PersonalRecords>> {
    let activities = load_activities(&state, user).await?;
    Ok(Json(compute_records(&activities)))
}

#[derive(Serialize)]
pub struct PredictionsResponse {
    /// `None` when no run is long enough to predict from
    pub predictions: Option<RacePredictions>,
}

async fn get_predictions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PredictionsResponse>> {
    let activities = load_activities(&state, user).await?;
    Ok(Json(PredictionsResponse {
        predictions: compute_predictions(&activities),
    }))
}

async fn get_badges(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<BadgeBoard>> {
    let activities = load_activities(&state, user).await?;
    Ok(Json(compute_badges(&activities, chrono::Utc::now())))
}

async fn get_program(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgramSuggestion>> {
    let activities = load_activities(&state, user).await?;
    Ok(Json(suggest_program(&activities)))
}

async fn load_activities(state: &AppState, user: AuthUser) -> Result<Vec<ActivityRecord>> {
    ActivityService::new(&state.strava_service, &state.config)
        .load_activities(user.athlete_id)
        .await
}

// ─── Training Plan ───────────────────────────────────────────

async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<PlanView> {
    let progress = state.db.get_progress(user.athlete_id);
    Json(build_plan_view(
        &progress,
        state.config.race_date,
        chrono::Utc::now(),
        state.config.streak_order,
    ))
}

#[derive(Deserialize, Validate)]
struct ToggleQuery {
    /// Day key, `w<week>d<day>`
    #[validate(length(min = 4, max = 6))]
    key: String,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub key: String,
    pub completed: bool,
    pub streaks: StreakSummary,
}

/// Flip one plan session between done and not done.
async fn toggle_plan_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ToggleQuery>,
) -> Result<Json<ToggleResponse>> {
    validate(&params)?;
    let key: DayKey = params
        .key
        .parse()
        .map_err(|e: DayKeyError| AppError::BadRequest(e.to_string()))?;

    let completed = state.db.toggle_session(user.athlete_id, &key);
    tracing::info!(athlete_id = user.athlete_id, key = %key, completed, "Toggled plan session");

    let streaks =
        compute_streaks_with_order(&state.db.get_progress(user.athlete_id), state.config.streak_order);

    Ok(Json(ToggleResponse {
        key: key.to_string(),
        completed,
        streaks,
    }))
}
