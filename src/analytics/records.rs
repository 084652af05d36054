// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal records: best pace, longest run, biggest climb.

use crate::analytics::pace::comparable_pace;
use crate::models::{stats::RecordRun, ActivityRecord, PersonalRecords};

/// Scan the runs for the three personal records.
///
/// Each record is a left-to-right fold seeded with the first run, replacing
/// the holder only on a strict improvement, so ties keep the earliest entry.
pub fn compute_records(activities: &[ActivityRecord]) -> PersonalRecords {
    let best_pace = first_best(activities, |candidate, best| {
        pace_of(candidate) < pace_of(best)
    });
    let longest_run = first_best(activities, |candidate, best| {
        candidate.distance_meters > best.distance_meters
    });
    let biggest_elevation = first_best(activities, |candidate, best| {
        candidate.total_elevation_gain_meters > best.total_elevation_gain_meters
    });

    PersonalRecords {
        best_pace: best_pace.map(RecordRun::from),
        longest_run: longest_run.map(RecordRun::from),
        biggest_elevation: biggest_elevation.map(RecordRun::from),
    }
}

fn pace_of(run: &ActivityRecord) -> f64 {
    comparable_pace(run.distance_meters, run.moving_time_seconds as f64)
}

fn first_best<F>(activities: &[ActivityRecord], better: F) -> Option<&ActivityRecord>
where
    F: Fn(&ActivityRecord, &ActivityRecord) -> bool,
{
    super::runs(activities).fold(None, |best, run| match best {
        Some(current) if !better(run, current) => Some(current),
        _ => Some(run),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{ride, run};

    #[test]
    fn test_empty_set_has_default_records() {
        let records = compute_records(&[]);
        assert_eq!(records, PersonalRecords::default());
        assert_eq!(records.best_pace_min_per_km(), 0.0);
        assert_eq!(records.longest_distance_km(), 0.0);
        assert_eq!(records.biggest_elevation_meters(), 0.0);
    }

    #[test]
    fn test_zero_distance_never_wins_best_pace() {
        let activities = vec![
            run(1, "2024-03-01T08:00:00Z", 0.0, 10),
            run(2, "2024-03-02T08:00:00Z", 5_000.0, 1800),
            run(3, "2024-03-03T08:00:00Z", 0.0, 1),
        ];

        let records = compute_records(&activities);
        let best = records.best_pace.unwrap();
        assert_eq!(best.activity_id, 2);
        assert_eq!(best.pace_min_per_km, 6.0);
    }

    #[test]
    fn test_all_zero_distance_keeps_first_with_display_pace_zero() {
        let activities = vec![
            run(1, "2024-03-01T08:00:00Z", 0.0, 600),
            run(2, "2024-03-02T08:00:00Z", 0.0, 300),
        ];

        let records = compute_records(&activities);
        assert_eq!(records.best_pace.as_ref().unwrap().activity_id, 1);
        assert_eq!(records.best_pace_min_per_km(), 0.0);
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let mut a = run(1, "2024-03-01T08:00:00Z", 10_000.0, 3000);
        let mut b = run(2, "2024-03-02T08:00:00Z", 10_000.0, 3000);
        a.total_elevation_gain_meters = 120.0;
        b.total_elevation_gain_meters = 120.0;

        let records = compute_records(&[a, b]);
        assert_eq!(records.best_pace.unwrap().activity_id, 1);
        assert_eq!(records.longest_run.unwrap().activity_id, 1);
        assert_eq!(records.biggest_elevation.unwrap().activity_id, 1);
    }

    #[test]
    fn test_each_record_is_independent() {
        let fast = run(1, "2024-03-01T08:00:00Z", 5_000.0, 1200); // 4:00/km
        let long = run(2, "2024-03-02T08:00:00Z", 21_097.0, 7200);
        let mut hilly = run(3, "2024-03-03T08:00:00Z", 12_000.0, 4500);
        hilly.total_elevation_gain_meters = 640.0;

        let records = compute_records(&[fast, long, hilly]);
        assert_eq!(records.best_pace.as_ref().unwrap().activity_id, 1);
        assert_eq!(records.longest_run.as_ref().unwrap().activity_id, 2);
        assert_eq!(records.longest_distance_km(), 21.097);
        assert_eq!(records.biggest_elevation.unwrap().activity_id, 3);
    }

    #[test]
    fn test_non_runs_do_not_hold_records() {
        let activities = vec![
            ride(1, "2024-03-01T08:00:00Z", 80_000.0, 9000),
            run(2, "2024-03-02T08:00:00Z", 8_000.0, 2600),
        ];

        let records = compute_records(&activities);
        assert_eq!(records.longest_run.unwrap().activity_id, 2);
    }
}
