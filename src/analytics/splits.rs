// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-km splits and chart series for a single activity.

use serde::Serialize;

use crate::analytics::pace::{format_pace_seconds, pace_parts, round1, round2};
use crate::models::{ActivityRecord, ActivityStreams, Split};

/// A split is fast or slow when it differs from the average by more than this.
pub const EFFORT_TOLERANCE_SECONDS: i64 = 5;

pub const STREAM_DISTANCE: &str = "distance";
pub const STREAM_ALTITUDE: &str = "altitude";
pub const STREAM_HEARTRATE: &str = "heartrate";
pub const STREAM_TIME: &str = "time";

/// Stream keys requested with an activity detail.
pub const DETAIL_STREAM_KEYS: [&str; 4] =
    [STREAM_DISTANCE, STREAM_ALTITUDE, STREAM_HEARTRATE, STREAM_TIME];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum SplitEffort {
    Fast,
    Even,
    Slow,
}

/// One row of the per-km table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct KmSplit {
    pub km: u32,
    pub distance_km: f64,
    /// `M:SS` per km
    pub pace: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub pace_seconds: u64,
    pub effort: SplitEffort,
}

/// Labelled series for a line chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChartSeries {
    pub labels: Vec<f64>,
    pub values: Vec<f64>,
}

/// Average pace of an activity in whole seconds per km, as displayed.
pub fn average_pace_seconds(activity: &ActivityRecord) -> u64 {
    let (minutes, seconds) = pace_parts(seconds_per_km(
        activity.distance_meters,
        activity.moving_time_seconds as f64,
    ));
    minutes * 60 + seconds
}

/// Per-km splits for an activity.
///
/// Provider splits take precedence; otherwise whole kilometers are cut out of
/// the distance and time streams. With neither, there are no rows.
pub fn compute_km_splits(activity: &ActivityRecord, streams: &ActivityStreams) -> Vec<KmSplit> {
    let rows = match activity.splits.as_deref() {
        Some(splits) if !splits.is_empty() => rows_from_splits(splits),
        _ => match (streams.get(STREAM_DISTANCE), streams.get(STREAM_TIME)) {
            (Some(distance), Some(time)) => {
                rows_from_streams(activity.distance_meters, &distance.data, &time.data)
            }
            _ => Vec::new(),
        },
    };

    let average = average_pace_seconds(activity) as i64;
    rows.into_iter()
        .map(|(km, distance_km, seconds)| {
            let (minutes, secs) = pace_parts(seconds);
            let pace_seconds = minutes * 60 + secs;
            KmSplit {
                km,
                distance_km,
                pace: format_pace_seconds(seconds),
                pace_seconds,
                effort: classify(pace_seconds as i64, average),
            }
        })
        .collect()
}

/// Altitude against distance (km), when both streams exist.
pub fn elevation_profile(streams: &ActivityStreams) -> Option<ChartSeries> {
    let distance = streams.get(STREAM_DISTANCE)?;
    let altitude = streams.get(STREAM_ALTITUDE)?;
    Some(ChartSeries {
        labels: distance.data.iter().map(|d| round1(d / 1000.0)).collect(),
        values: altitude.data.clone(),
    })
}

/// Heart rate against elapsed whole minutes, when both streams exist.
pub fn heart_rate_series(streams: &ActivityStreams) -> Option<ChartSeries> {
    let heartrate = streams.get(STREAM_HEARTRATE)?;
    let time = streams.get(STREAM_TIME)?;
    Some(ChartSeries {
        labels: time.data.iter().map(|t| (t / 60.0).floor()).collect(),
        values: heartrate.data.clone(),
    })
}

fn classify(pace_seconds: i64, average_seconds: i64) -> SplitEffort {
    if pace_seconds < average_seconds - EFFORT_TOLERANCE_SECONDS {
        SplitEffort::Fast
    } else if pace_seconds > average_seconds + EFFORT_TOLERANCE_SECONDS {
        SplitEffort::Slow
    } else {
        SplitEffort::Even
    }
}

fn seconds_per_km(distance_meters: f64, time_seconds: f64) -> f64 {
    if distance_meters > 0.0 {
        time_seconds / (distance_meters / 1000.0)
    } else {
        0.0
    }
}

/// `(km, distance_km, seconds_per_km)` for each provider split, partial ones
/// included.
fn rows_from_splits(splits: &[Split]) -> Vec<(u32, f64, f64)> {
    splits
        .iter()
        .enumerate()
        .map(|(idx, split)| {
            (
                idx as u32 + 1,
                round2(split.distance_meters / 1000.0),
                seconds_per_km(split.distance_meters, split.moving_time_seconds as f64),
            )
        })
        .collect()
}

/// `(km, 1.0, seconds)` for each whole km found in the streams.
fn rows_from_streams(total_meters: f64, distance: &[f64], time: &[f64]) -> Vec<(u32, f64, f64)> {
    let whole_km = (total_meters / 1000.0).floor().max(0.0) as u32;
    let first_at = |meters: f64| distance.iter().position(|d| *d >= meters);

    (1..=whole_km)
        .filter_map(|km| {
            let start = first_at(f64::from(km - 1) * 1000.0)?;
            let end = first_at(f64::from(km) * 1000.0)?;
            if start == end {
                return None;
            }
            let elapsed = time.get(end)? - time.get(start)?;
            Some((km, 1.0, elapsed))
        })
        .collect()
}
