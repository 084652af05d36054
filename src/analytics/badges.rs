// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tiered achievement badges.
//!
//! Each category reduces the run set to one scalar and checks it against an
//! ascending list of tiers. The highest satisfied tier is the category's
//! single unlocked badge; every unmet tier is reported as locked with the
//! progress still needed.

use chrono::{DateTime, Duration, Utc};

use crate::analytics::pace::{comparable_pace, format_pace};
use crate::models::{ActivityRecord, Badge, BadgeBoard, BadgeCategory};

/// Window used by the regularity badges.
pub const REGULARITY_WINDOW_DAYS: i64 = 7;

/// One tier of a badge category.
#[derive(Debug, Clone, Copy)]
pub struct TierSpec {
    pub threshold: f64,
    pub tier: u8,
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const fn tier(
    threshold: f64,
    tier: u8,
    icon: &'static str,
    name: &'static str,
    description: &'static str,
) -> TierSpec {
    TierSpec {
        threshold,
        tier,
        icon,
        name,
        description,
    }
}

pub const DISTANCE_TIERS: [TierSpec; 3] = [
    tier(100.0, 1, "🥉", "Explorer", "Run 100 km in total"),
    tier(500.0, 2, "🥈", "Voyager", "Run 500 km in total"),
    tier(1000.0, 3, "🥇", "Globetrotter", "Run 1000 km in total"),
];

pub const RUN_COUNT_TIERS: [TierSpec; 3] = [
    tier(10.0, 1, "👟", "Getting Started", "Log 10 runs"),
    tier(50.0, 2, "🏃", "Committed", "Log 50 runs"),
    tier(100.0, 3, "💯", "Centurion", "Log 100 runs"),
];

/// Pace tiers are met by running *faster* than the threshold (min/km).
pub const PACE_TIERS: [TierSpec; 2] = [
    tier(5.5, 1, "⚡", "Quick Feet", "Run a pace under 5:30/km"),
    tier(4.5, 2, "🚀", "Speedster", "Run a pace under 4:30/km"),
];

pub const LONG_RUN_TIERS: [TierSpec; 2] = [
    tier(21_000.0, 2, "🏅", "Half Marathoner", "Complete a 21 km run"),
    tier(42_195.0, 3, "🏆", "Marathoner", "Complete a marathon-distance run"),
];

pub const REGULARITY_TIERS: [TierSpec; 2] = [
    tier(3.0, 1, "📅", "Regular", "Run 3 times in 7 days"),
    tier(4.0, 2, "🔥", "Dedicated", "Run 4 times in 7 days"),
];

/// Tier table for a category, ascending.
pub fn tiers(category: BadgeCategory) -> &'static [TierSpec] {
    match category {
        BadgeCategory::Distance => &DISTANCE_TIERS,
        BadgeCategory::RunCount => &RUN_COUNT_TIERS,
        BadgeCategory::Pace => &PACE_TIERS,
        BadgeCategory::LongRun => &LONG_RUN_TIERS,
        BadgeCategory::Regularity => &REGULARITY_TIERS,
    }
}

/// Scalars the badge categories are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeStats {
    pub total_km: f64,
    pub run_count: u32,
    /// Best comparable pace, `+inf` without any distance
    pub best_pace: f64,
    pub longest_run_meters: f64,
    pub runs_last_week: u32,
}

impl BadgeStats {
    pub fn from_runs(activities: &[ActivityRecord], now: DateTime<Utc>) -> Self {
        let window_start = now - Duration::days(REGULARITY_WINDOW_DAYS);

        let mut stats = BadgeStats {
            total_km: 0.0,
            run_count: 0,
            best_pace: f64::INFINITY,
            longest_run_meters: 0.0,
            runs_last_week: 0,
        };

        for run in super::runs(activities) {
            stats.total_km += run.distance_km();
            stats.run_count += 1;
            stats.best_pace = stats
                .best_pace
                .min(comparable_pace(run.distance_meters, run.moving_time_seconds as f64));
            stats.longest_run_meters = stats.longest_run_meters.max(run.distance_meters);
            if run.start_time >= window_start {
                stats.runs_last_week += 1;
            }
        }

        stats
    }

    fn value(&self, category: BadgeCategory) -> f64 {
        match category {
            BadgeCategory::Distance => self.total_km,
            BadgeCategory::RunCount => f64::from(self.run_count),
            BadgeCategory::Pace => self.best_pace,
            BadgeCategory::LongRun => self.longest_run_meters,
            BadgeCategory::Regularity => f64::from(self.runs_last_week),
        }
    }
}

/// Evaluate all badge categories for a run set.
///
/// `now` anchors the trailing seven-day regularity window.
pub fn compute_badges(activities: &[ActivityRecord], now: DateTime<Utc>) -> BadgeBoard {
    let stats = BadgeStats::from_runs(activities, now);
    let mut board = BadgeBoard::default();

    for category in BadgeCategory::ALL {
        let value = stats.value(category);
        let specs = tiers(category);

        let unlocked = specs
            .iter()
            .rev()
            .find(|spec| is_met(category, value, spec.threshold));
        if let Some(spec) = unlocked {
            board
                .unlocked
                .push(build_badge(category, spec, unlocked_progress(category, &stats)));
        }

        for spec in specs.iter().filter(|spec| !is_met(category, value, spec.threshold)) {
            board.locked.push(build_badge(
                category,
                spec,
                remaining_progress(category, &stats, spec.threshold),
            ));
        }
    }

    board
}

fn is_met(category: BadgeCategory, value: f64, threshold: f64) -> bool {
    match category {
        BadgeCategory::Pace => value < threshold,
        _ => value >= threshold,
    }
}

fn build_badge(category: BadgeCategory, spec: &TierSpec, progress: String) -> Badge {
    Badge {
        category,
        tier: spec.tier,
        threshold: spec.threshold,
        icon: spec.icon.to_string(),
        name: spec.name.to_string(),
        description: spec.description.to_string(),
        progress,
    }
}

fn unlocked_progress(category: BadgeCategory, stats: &BadgeStats) -> String {
    match category {
        BadgeCategory::Distance => format!("{:.1} km run", stats.total_km),
        BadgeCategory::RunCount => format!("{} runs logged", stats.run_count),
        BadgeCategory::Pace => format!("Best pace {}/km", format_pace(stats.best_pace)),
        BadgeCategory::LongRun => {
            format!("Longest run {:.1} km", stats.longest_run_meters / 1000.0)
        }
        BadgeCategory::Regularity => format!("{} runs in the last 7 days", stats.runs_last_week),
    }
}

fn remaining_progress(category: BadgeCategory, stats: &BadgeStats, threshold: f64) -> String {
    match category {
        BadgeCategory::Distance => format!("{:.1} km to go", threshold - stats.total_km),
        BadgeCategory::RunCount => {
            format!("{} runs to go", threshold as u32 - stats.run_count)
        }
        BadgeCategory::Pace => {
            if stats.best_pace.is_finite() {
                format!(
                    "Run under {}/km (best {}/km)",
                    format_pace(threshold),
                    format_pace(stats.best_pace)
                )
            } else {
                format!("Run under {}/km", format_pace(threshold))
            }
        }
        BadgeCategory::LongRun => format!(
            "{:.1} km to go on your longest run",
            (threshold - stats.longest_run_meters) / 1000.0
        ),
        BadgeCategory::Regularity => format!(
            "{} more runs this week",
            threshold as u32 - stats.runs_last_week
        ),
    }
}
