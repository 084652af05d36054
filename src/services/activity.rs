// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity loading service.
//!
//! Handles the fetch-then-compute workflow:
//! 1. Fetch the athlete's history from Strava (token management is handled
//!    by StravaService)
//! 2. Normalize it into activity records
//! 3. Hand the records to the analytics engines
//!
//! The activity detail view also pulls streams, which are optional: a failed
//! stream fetch degrades to "no chart data" instead of failing the request.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::pace::{format_pace_seconds, round2};
use crate::analytics::splits::{
    compute_km_splits, elevation_profile, heart_rate_series, ChartSeries, KmSplit,
    DETAIL_STREAM_KEYS,
};
use crate::config::Config;
use crate::error::Result;
use crate::models::{ActivityRecord, ActivityStreams};
use crate::services::StravaService;

/// One row of the recent-activity list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitySummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub activity_type: String,
    pub start_time: DateTime<Utc>,
    /// Distance rounded to two decimals
    pub distance_km: f64,
    /// Whole minutes of moving time
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub moving_time_minutes: u64,
    /// `M:SS` per km, `0:00` without distance
    pub pace: String,
}

impl From<&ActivityRecord> for ActivitySummary {
    fn from(activity: &ActivityRecord) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            activity_type: activity.activity_type.clone(),
            start_time: activity.start_time,
            distance_km: round2(activity.distance_km()),
            moving_time_minutes: activity.moving_time_seconds / 60,
            pace: activity_pace(activity),
        }
    }
}

/// Everything the activity detail view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityDetail {
    #[serde(flatten)]
    pub summary: ActivitySummary,
    /// Seconds past the whole minutes in `moving_time_minutes`
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub moving_time_remainder_seconds: u64,
    pub average_heart_rate: Option<u32>,
    pub max_heart_rate: Option<u32>,
    pub elevation_gain_meters: u32,
    /// Steps per minute (both feet)
    pub cadence_spm: Option<u32>,
    pub splits: Vec<KmSplit>,
    pub elevation_profile: Option<ChartSeries>,
    pub heart_rate: Option<ChartSeries>,
}

impl ActivityDetail {
    pub fn build(activity: &ActivityRecord, streams: &ActivityStreams) -> Self {
        Self {
            summary: ActivitySummary::from(activity),
            moving_time_remainder_seconds: activity.moving_time_seconds % 60,
            average_heart_rate: activity.average_heart_rate.map(|hr| hr.round() as u32),
            max_heart_rate: activity.max_heart_rate.map(|hr| hr.round() as u32),
            elevation_gain_meters: activity.total_elevation_gain_meters.round() as u32,
            cadence_spm: activity.cadence_spm().map(|spm| spm.round() as u32),
            splits: compute_km_splits(activity, streams),
            elevation_profile: elevation_profile(streams),
            heart_rate: heart_rate_series(streams),
        }
    }
}

fn activity_pace(activity: &ActivityRecord) -> String {
    if activity.distance_meters > 0.0 {
        format_pace_seconds(activity.moving_time_seconds as f64 / activity.distance_km())
    } else {
        format_pace_seconds(0.0)
    }
}

/// Loads activities for the analytics endpoints.
pub struct ActivityService<'a> {
    strava: &'a StravaService,
    page_size: u32,
    max_pages: u32,
}

impl<'a> ActivityService<'a> {
    pub fn new(strava: &'a StravaService, config: &Config) -> Self {
        Self {
            strava,
            page_size: config.activity_page_size,
            max_pages: config.max_activity_pages,
        }
    }

    /// Full (capped) history for an athlete, newest first as Strava returns it.
    pub async fn load_activities(&self, athlete_id: u64) -> Result<Vec<ActivityRecord>> {
        let activities = self
            .strava
            .fetch_activities(athlete_id, self.page_size, self.max_pages)
            .await?;

        tracing::debug!(athlete_id, count = activities.len(), "Loaded activity history");
        Ok(activities)
    }

    /// The `limit` most recent activities.
    pub async fn recent_summaries(
        &self,
        athlete_id: u64,
        limit: u32,
    ) -> Result<Vec<ActivitySummary>> {
        let page = self.strava.list_activities(athlete_id, 1, limit).await?;
        Ok(page
            .into_iter()
            .map(ActivityRecord::from)
            .map(|activity| ActivitySummary::from(&activity))
            .collect())
    }

    /// Activity detail with splits and, when available, stream charts.
    pub async fn activity_detail(&self, athlete_id: u64, activity_id: u64) -> Result<ActivityDetail> {
        let activity = ActivityRecord::from(self.strava.get_activity(athlete_id, activity_id).await?);

        let streams = match self
            .strava
            .get_activity_streams(athlete_id, activity_id, &DETAIL_STREAM_KEYS)
            .await
        {
            Ok(streams) => streams,
            Err(e) => {
                tracing::warn!(
                    athlete_id,
                    activity_id,
                    error = %e,
                    "No streams available, continuing without chart data"
                );
                ActivityStreams::new()
            }
        };

        Ok(ActivityDetail::build(&activity, &streams))
    }
}
