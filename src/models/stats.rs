//! Derived running statistics returned to the dashboard.
//!
//! Everything here is recomputed from the current run set on every
//! request; nothing is stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::pace;
use crate::models::ActivityRecord;

/// Running totals for one Sunday-aligned week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub total_distance_km: f64,
    pub total_time_seconds: u64,
    pub run_count: u32,
}

impl WeeklyBucket {
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            total_distance_km: 0.0,
            total_time_seconds: 0,
            run_count: 0,
        }
    }

    /// Add one run to the bucket.
    pub fn add(&mut self, run: &ActivityRecord) {
        self.total_distance_km += run.distance_km();
        self.total_time_seconds += run.moving_time_seconds;
        self.run_count += 1;
    }
}

/// One row of the weekly progression chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    /// Distance rounded to one decimal
    pub distance_km: f64,
    /// Average pace rounded to one decimal, 0 when the week has no distance
    pub avg_pace_min_per_km: f64,
    pub total_time_seconds: u64,
    pub run_count: u32,
}

/// A run that holds a personal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRun {
    pub activity_id: u64,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub distance_meters: f64,
    pub moving_time_seconds: u64,
    pub elevation_gain_meters: f64,
    /// Display pace (0 when the run has no distance)
    pub pace_min_per_km: f64,
}

impl From<&ActivityRecord> for RecordRun {
    fn from(run: &ActivityRecord) -> Self {
        Self {
            activity_id: run.id,
            name: run.name.clone(),
            start_time: run.start_time,
            distance_meters: run.distance_meters,
            moving_time_seconds: run.moving_time_seconds,
            elevation_gain_meters: run.total_elevation_gain_meters,
            pace_min_per_km: pace::pace_min_per_km(
                run.distance_meters,
                run.moving_time_seconds as f64,
            ),
        }
    }
}

/// Personal records over a run set. Every field is `None` for an empty set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecords {
    pub best_pace: Option<RecordRun>,
    pub longest_run: Option<RecordRun>,
    pub biggest_elevation: Option<RecordRun>,
}

impl PersonalRecords {
    /// Best pace in min/km, 0 when there is no record.
    pub fn best_pace_min_per_km(&self) -> f64 {
        self.best_pace
            .as_ref()
            .map(|r| r.pace_min_per_km)
            .unwrap_or(0.0)
    }

    /// Longest distance in km, 0 when there is no record.
    pub fn longest_distance_km(&self) -> f64 {
        self.longest_run
            .as_ref()
            .map(|r| r.distance_meters / 1000.0)
            .unwrap_or(0.0)
    }

    /// Greatest elevation gain in meters, 0 when there is no record.
    pub fn biggest_elevation_meters(&self) -> f64 {
        self.biggest_elevation
            .as_ref()
            .map(|r| r.elevation_gain_meters)
            .unwrap_or(0.0)
    }
}

/// A predicted finish time for one race distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacePrediction {
    pub distance_km: f64,
    pub minutes: f64,
    /// Human-readable rendering of `minutes`
    pub formatted: String,
}

/// Riegel predictions for the standard race distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacePredictions {
    /// Average pace of the recent runs the predictions are based on
    pub base_pace_min_per_km: f64,
    /// Number of runs averaged
    pub sample_size: usize,
    pub five_k: RacePrediction,
    pub ten_k: RacePrediction,
    pub half_marathon: RacePrediction,
    pub marathon: RacePrediction,
}
