// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Race-time predictions from recent training paces.

use crate::analytics::pace::{format_duration, pace_min_per_km, predict_race_time};
use crate::models::stats::RacePrediction;
use crate::models::{ActivityRecord, RacePredictions};

/// Runs at or below this distance are too short to predict from.
pub const MIN_PREDICTION_DISTANCE_METERS: f64 = 3000.0;
/// Number of most recent qualifying runs averaged into the base pace.
pub const RECENT_RUNS: usize = 10;

pub const HALF_MARATHON_KM: f64 = 21.1;
pub const MARATHON_KM: f64 = 42.2;

/// Predict 5k, 10k, half and full marathon times.
///
/// Returns `None` when no run is longer than
/// [`MIN_PREDICTION_DISTANCE_METERS`].
pub fn compute_predictions(activities: &[ActivityRecord]) -> Option<RacePredictions> {
    let mut qualifying: Vec<&ActivityRecord> = super::runs(activities)
        .filter(|run| run.distance_meters > MIN_PREDICTION_DISTANCE_METERS)
        .collect();
    if qualifying.is_empty() {
        return None;
    }

    // Newest first; stable so equal timestamps keep provider order
    qualifying.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    qualifying.truncate(RECENT_RUNS);

    let total: f64 = qualifying
        .iter()
        .map(|run| pace_min_per_km(run.distance_meters, run.moving_time_seconds as f64))
        .sum();
    let base_pace = total / qualifying.len() as f64;

    Some(RacePredictions {
        base_pace_min_per_km: base_pace,
        sample_size: qualifying.len(),
        five_k: predict(5.0, base_pace),
        ten_k: predict(10.0, base_pace),
        half_marathon: predict(HALF_MARATHON_KM, base_pace),
        marathon: predict(MARATHON_KM, base_pace),
    })
}

fn predict(distance_km: f64, base_pace: f64) -> RacePrediction {
    let minutes = predict_race_time(distance_km, base_pace);
    RacePrediction {
        distance_km,
        minutes,
        formatted: format_duration(minutes),
    }
}
