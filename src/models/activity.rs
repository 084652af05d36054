// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity payloads and the normalized activity record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Activity type tag that participates in running metrics.
pub const RUN_TYPE: &str = "Run";

/// Raw activity as returned by the Strava list and detail endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivity {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub moving_time: u64,
    pub start_date: DateTime<Utc>,
    pub total_elevation_gain: Option<f64>,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub average_cadence: Option<f64>,
    /// Only present on the detail endpoint.
    pub splits_metric: Option<Vec<StravaSplit>>,
}

/// A provider-supplied split (roughly one kilometer).
#[derive(Debug, Clone, Deserialize)]
pub struct StravaSplit {
    pub distance: f64,
    pub moving_time: u64,
}

/// One stream channel (`key_by_type=true` response shape).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StreamData {
    #[serde(default)]
    pub data: Vec<f64>,
}

/// Streams keyed by channel name (distance, altitude, heartrate, time).
pub type ActivityStreams = HashMap<String, StreamData>;

/// Split within a normalized activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub distance_meters: f64,
    pub moving_time_seconds: u64,
}

/// Normalized activity consumed by every analytics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Activity type (Run, Ride, Hike, etc.)
    pub activity_type: String,
    /// Distance in meters
    pub distance_meters: f64,
    /// Moving time in seconds
    pub moving_time_seconds: u64,
    /// Start date/time
    pub start_time: DateTime<Utc>,
    /// Elevation gain in meters (0 when the provider omits it)
    pub total_elevation_gain_meters: f64,
    pub average_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    /// Single-leg cadence as reported by the provider.
    pub average_cadence: Option<f64>,
    /// Provider splits, authoritative over stream-derived paces when present.
    pub splits: Option<Vec<Split>>,
}

impl ActivityRecord {
    /// Whether this activity takes part in running metrics.
    pub fn is_run(&self) -> bool {
        self.activity_type == RUN_TYPE
    }

    /// Distance in kilometers.
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Average cadence in steps per minute.
    pub fn cadence_spm(&self) -> Option<f64> {
        self.average_cadence.map(steps_per_minute)
    }
}

impl From<StravaActivity> for ActivityRecord {
    fn from(raw: StravaActivity) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            activity_type: raw.activity_type,
            distance_meters: raw.distance.max(0.0),
            moving_time_seconds: raw.moving_time,
            start_time: raw.start_date,
            total_elevation_gain_meters: raw.total_elevation_gain.unwrap_or(0.0).max(0.0),
            average_heart_rate: raw.average_heartrate.filter(|hr| *hr > 0.0),
            max_heart_rate: raw.max_heartrate.filter(|hr| *hr > 0.0),
            average_cadence: raw.average_cadence,
            splits: raw.splits_metric.map(|splits| {
                splits
                    .into_iter()
                    .map(|s| Split {
                        distance_meters: s.distance,
                        moving_time_seconds: s.moving_time,
                    })
                    .collect()
            }),
        }
    }
}

/// Convert single-leg cadence into steps per minute (both feet).
pub fn steps_per_minute(one_foot_cadence: f64) -> f64 {
    one_foot_cadence * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": 12345678,
        "name": "Morning Run",
        "type": "Run",
        "sport_type": "Run",
        "distance": 10234.5,
        "moving_time": 3120,
        "elapsed_time": 3300,
        "start_date": "2024-05-12T06:30:00Z",
        "total_elevation_gain": 87.4,
        "average_heartrate": 152.3,
        "max_heartrate": 178.0,
        "average_cadence": 84.5,
        "splits_metric": [
            {"distance": 1000.0, "moving_time": 305, "split": 1},
            {"distance": 1000.0, "moving_time": 298, "split": 2},
            {"distance": 234.5, "moving_time": 70, "split": 3}
        ]
    }"#;

    #[test]
    fn test_normalize_detail_payload() {
        let raw: StravaActivity = serde_json::from_str(DETAIL_JSON).unwrap();
        let record = ActivityRecord::from(raw);

        assert_eq!(record.id, 12345678);
        assert!(record.is_run());
        assert_eq!(record.distance_meters, 10234.5);
        assert_eq!(record.moving_time_seconds, 3120);
        assert_eq!(record.total_elevation_gain_meters, 87.4);
        assert_eq!(record.average_heart_rate, Some(152.3));

        let splits = record.splits.as_ref().unwrap();
        assert_eq!(splits.len(), 3);
        assert_eq!(splits[2].distance_meters, 234.5);
        assert_eq!(splits[2].moving_time_seconds, 70);
    }

    #[test]
    fn test_normalize_summary_payload_defaults() {
        let raw: StravaActivity = serde_json::from_str(
            r#"{"id": 1, "name": "Commute", "type": "Ride", "distance": 5000.0,
                "moving_time": 900, "start_date": "2024-05-12T06:30:00Z"}"#,
        )
        .unwrap();
        let record = ActivityRecord::from(raw);

        assert!(!record.is_run());
        assert_eq!(record.total_elevation_gain_meters, 0.0);
        assert_eq!(record.average_cadence, None);
        assert!(record.splits.is_none());
    }

    #[test]
    fn test_cadence_is_reported_in_steps_per_minute() {
        let raw: StravaActivity = serde_json::from_str(DETAIL_JSON).unwrap();
        let record = ActivityRecord::from(raw);

        assert_eq!(record.cadence_spm(), Some(169.0));
        assert_eq!(steps_per_minute(90.0), 180.0);
    }

    #[test]
    fn test_streams_deserialize_by_type() {
        let streams: ActivityStreams = serde_json::from_str(
            r#"{"distance": {"data": [0.0, 500.0, 1000.0], "series_type": "distance"},
                "time": {"data": [0, 150, 300]}}"#,
        )
        .unwrap();

        assert_eq!(streams["distance"].data, vec![0.0, 500.0, 1000.0]);
        assert_eq!(streams["time"].data, vec![0.0, 150.0, 300.0]);
        assert!(!streams.contains_key("heartrate"));
    }
}
