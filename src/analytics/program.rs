// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training programs: level suggestion from recent volume and the
//! sixteen-week race plan view.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::streaks::{compute_streaks_with_order, StreakOrder};
use crate::models::training::{
    is_rest_session, DAY_NAMES, PLAN_WEEKS, TARGET_PACE, TARGET_TIME, TRAINING_PLAN,
};
use crate::models::{ActivityRecord, StreakSummary, TrainingProgress};
use crate::time_utils::month_key;

/// Baseline volume (km) assumed when there are no runs at all.
pub const DEFAULT_BASELINE_KM: f64 = 20.0;

const WEEK_MILLIS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

// ─── Level suggestion ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum TrainingLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl TrainingLevel {
    pub const ALL: [TrainingLevel; 3] = [
        TrainingLevel::Beginner,
        TrainingLevel::Intermediate,
        TrainingLevel::Advanced,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            TrainingLevel::Beginner => "Beginner",
            TrainingLevel::Intermediate => "Intermediate",
            TrainingLevel::Advanced => "Advanced",
        }
    }

    /// Weekly volume for this level given the athlete's baseline.
    pub fn weekly_km(&self, baseline_km: f64) -> u32 {
        let (floor, factor) = match self {
            TrainingLevel::Beginner => (15.0, 0.8),
            TrainingLevel::Intermediate => (30.0, 1.0),
            TrainingLevel::Advanced => (50.0, 1.2),
        };
        f64::max(floor, (baseline_km * factor).round()) as u32
    }

    pub fn sessions(&self) -> [&'static str; 7] {
        match self {
            TrainingLevel::Beginner => [
                "Monday: Rest",
                "Tuesday: 30min endurance",
                "Wednesday: Rest",
                "Thursday: 35min fartlek",
                "Friday: Rest",
                "Saturday: 45min endurance",
                "Sunday: 1h long run",
            ],
            TrainingLevel::Intermediate => [
                "Monday: Rest or 30min recovery",
                "Tuesday: VO2max 8x400m",
                "Wednesday: 45min endurance",
                "Thursday: Threshold 50min",
                "Friday: Rest",
                "Saturday: 1h active endurance",
                "Sunday: 1h30-2h long run",
            ],
            TrainingLevel::Advanced => [
                "Monday: 40min recovery",
                "Tuesday: Intervals 5x1000m",
                "Wednesday: 1h endurance",
                "Thursday: Threshold + VO2max",
                "Friday: 45min easy",
                "Saturday: 1h15 tempo",
                "Sunday: 2h-2h30 long run",
            ],
        }
    }

    /// Level suggested for a baseline volume and a run count.
    pub fn suggest(baseline_km: f64, run_count: usize) -> Self {
        if baseline_km > 45.0 && run_count > 50 {
            TrainingLevel::Advanced
        } else if baseline_km > 25.0 && run_count > 30 {
            TrainingLevel::Intermediate
        } else {
            TrainingLevel::Beginner
        }
    }
}

/// One program template scaled to the athlete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgramTemplate {
    pub level: TrainingLevel,
    pub title: String,
    pub weekly_km: u32,
    pub sessions: Vec<String>,
    pub suggested: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgramSuggestion {
    /// Mean distance per calendar month that has runs
    pub baseline_km: f64,
    pub run_count: usize,
    pub suggested: TrainingLevel,
    pub programs: Vec<ProgramTemplate>,
}

/// Mean run distance (km) per calendar month, [`DEFAULT_BASELINE_KM`]
/// without runs.
pub fn baseline_volume_km(activities: &[ActivityRecord]) -> f64 {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for run in super::runs(activities) {
        *months.entry(month_key(run.start_time)).or_default() += run.distance_km();
    }

    if months.is_empty() {
        DEFAULT_BASELINE_KM
    } else {
        months.values().sum::<f64>() / months.len() as f64
    }
}

/// Scale the three program templates and pick one for the athlete.
pub fn suggest_program(activities: &[ActivityRecord]) -> ProgramSuggestion {
    let baseline_km = baseline_volume_km(activities);
    let run_count = super::runs(activities).count();
    let suggested = TrainingLevel::suggest(baseline_km, run_count);

    let programs = TrainingLevel::ALL
        .iter()
        .map(|level| ProgramTemplate {
            level: *level,
            title: level.title().to_string(),
            weekly_km: level.weekly_km(baseline_km),
            sessions: level.sessions().iter().map(|s| s.to_string()).collect(),
            suggested: *level == suggested,
        })
        .collect();

    ProgramSuggestion {
        baseline_km,
        run_count,
        suggested,
        programs,
    }
}

// ─── Race plan ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanSession {
    pub day: String,
    /// Day key used to toggle this session
    pub key: String,
    pub label: String,
    pub rest: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanWeekView {
    pub week: u8,
    pub volume_km: u32,
    pub current: bool,
    pub sessions: Vec<PlanSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanView {
    pub race_date: NaiveDate,
    pub weeks_until_race: i64,
    /// Zero-based index of the week highlighted as current
    pub current_week_index: usize,
    pub target_pace: String,
    pub target_time: String,
    pub streaks: StreakSummary,
    pub weeks: Vec<PlanWeekView>,
}

/// Whole weeks left until race day (midnight UTC), rounded up. Negative once
/// the race is more than a week past.
pub fn weeks_until_race(race_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let race_start = race_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let millis = (race_start - now).num_milliseconds() as f64;
    (millis / WEEK_MILLIS).ceil() as i64
}

/// Index of the current plan week: `16 - weeks_until_race`, clamped to the
/// plan.
pub fn current_week_index(weeks_until_race: i64) -> usize {
    let last = i64::from(PLAN_WEEKS) - 1;
    (i64::from(PLAN_WEEKS) - weeks_until_race).clamp(0, last) as usize
}

/// The full plan with completion flags and streaks for one athlete.
pub fn build_plan_view(
    progress: &TrainingProgress,
    race_date: NaiveDate,
    now: DateTime<Utc>,
    order: StreakOrder,
) -> PlanView {
    let weeks_until = weeks_until_race(race_date, now);
    let current = current_week_index(weeks_until);

    let weeks = TRAINING_PLAN
        .iter()
        .enumerate()
        .map(|(idx, week)| PlanWeekView {
            week: week.week,
            volume_km: week.volume_km,
            current: idx == current,
            sessions: week
                .sessions
                .iter()
                .zip(DAY_NAMES)
                .enumerate()
                .map(|(day, (label, day_name))| {
                    let key = week.day_key(day as u8).to_string();
                    PlanSession {
                        day: day_name.to_string(),
                        completed: progress.get(&key).copied().unwrap_or(false),
                        key,
                        label: label.to_string(),
                        rest: is_rest_session(label),
                    }
                })
                .collect(),
        })
        .collect();

    PlanView {
        race_date,
        weeks_until_race: weeks_until,
        current_week_index: current,
        target_pace: TARGET_PACE.to_string(),
        target_time: TARGET_TIME.to_string(),
        streaks: compute_streaks_with_order(progress, order),
        weeks,
    }
}
