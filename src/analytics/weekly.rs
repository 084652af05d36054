// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly volume aggregation.

use std::collections::BTreeMap;

use crate::analytics::pace::round1;
use crate::models::{ActivityRecord, WeeklyBucket, WeeklySummary};
use crate::time_utils::week_start;

/// Number of most recent weeks kept in the progression.
pub const TRAILING_WEEKS: usize = 12;

/// Group runs into Sunday-aligned weeks and return the last
/// [`TRAILING_WEEKS`] of them, oldest first.
///
/// Weeks without runs are not padded in.
pub fn compute_weekly_aggregates(activities: &[ActivityRecord]) -> Vec<WeeklySummary> {
    let buckets = weekly_buckets(activities);
    let skip = buckets.len().saturating_sub(TRAILING_WEEKS);

    buckets
        .into_values()
        .skip(skip)
        .map(|bucket| WeeklySummary {
            week_start: bucket.week_start,
            distance_km: round1(bucket.total_distance_km),
            avg_pace_min_per_km: if bucket.total_distance_km > 0.0 {
                round1((bucket.total_time_seconds as f64 / 60.0) / bucket.total_distance_km)
            } else {
                0.0
            },
            total_time_seconds: bucket.total_time_seconds,
            run_count: bucket.run_count,
        })
        .collect()
}

/// Every week that has at least one run, keyed (and so sorted) by week start.
pub fn weekly_buckets(
    activities: &[ActivityRecord],
) -> BTreeMap<chrono::NaiveDate, WeeklyBucket> {
    let mut buckets = BTreeMap::new();
    for run in super::runs(activities) {
        let key = week_start(run.start_time);
        buckets
            .entry(key)
            .or_insert_with(|| WeeklyBucket::new(key))
            .add(run);
    }
    buckets
}
