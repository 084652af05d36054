// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sixteen-week half-marathon plan and session completion tracking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of weeks in the plan.
pub const PLAN_WEEKS: u8 = 16;
/// Sessions per plan week.
pub const DAYS_PER_WEEK: u8 = 7;
/// Total number of plan slots.
pub const PLAN_SLOTS: u32 = PLAN_WEEKS as u32 * DAYS_PER_WEEK as u32;

/// Target half-marathon pace (min/km).
pub const TARGET_PACE: &str = "5:27";
/// Target half-marathon finish time.
pub const TARGET_TIME: &str = "1h55";

/// Day labels, Monday first.
pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Completion flags keyed by day-key string (`w<week>d<day>`).
///
/// Backed by a `BTreeMap`, so iteration is in key-string order.
pub type TrainingProgress = BTreeMap<String, bool>;

/// Identifies one session of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey {
    /// Plan week, 1..=16
    pub week: u8,
    /// Day index within the week, 0..=6 (Monday = 0)
    pub day: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayKeyError {
    #[error("day key must look like w<week>d<day>: {0}")]
    Malformed(String),
    #[error("week {0} is outside 1..=16")]
    WeekOutOfRange(u8),
    #[error("day {0} is outside 0..=6")]
    DayOutOfRange(u8),
}

impl DayKey {
    pub fn new(week: u8, day: u8) -> Result<Self, DayKeyError> {
        if !(1..=PLAN_WEEKS).contains(&week) {
            return Err(DayKeyError::WeekOutOfRange(week));
        }
        if day >= DAYS_PER_WEEK {
            return Err(DayKeyError::DayOutOfRange(day));
        }
        Ok(Self { week, day })
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}d{}", self.week, self.day)
    }
}

impl FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DayKeyError::Malformed(s.to_string());

        let rest = s.strip_prefix('w').ok_or_else(malformed)?;
        let (week, day) = rest.split_once('d').ok_or_else(malformed)?;

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(week) || !all_digits(day) {
            return Err(malformed());
        }

        let week: u8 = week.parse().map_err(|_| malformed())?;
        let day: u8 = day.parse().map_err(|_| malformed())?;
        DayKey::new(week, day)
    }
}

/// One week of the plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanWeek {
    pub week: u8,
    /// Planned weekly volume in km
    pub volume_km: u32,
    /// Session labels, Monday first
    pub sessions: [&'static str; 7],
}

impl PlanWeek {
    /// Key for day `day` of this week.
    pub fn day_key(&self, day: u8) -> DayKey {
        DayKey {
            week: self.week,
            day,
        }
    }
}

/// Whether a session label is a rest day.
pub fn is_rest_session(label: &str) -> bool {
    label.to_lowercase().contains("rest")
}

const fn week(week: u8, volume_km: u32, sessions: [&'static str; 7]) -> PlanWeek {
    PlanWeek {
        week,
        volume_km,
        sessions,
    }
}

/// The fixed plan, built around a 5:27/km half-marathon pace.
#[rustfmt::skip]
pub const TRAINING_PLAN: [PlanWeek; PLAN_WEEKS as usize] = [
    week(1, 30, ["Rest", "6km easy 6:00/km", "6km endurance 5:50/km", "Rest", "6km easy", "Rest", "10km long run 6:10/km"]),
    week(2, 35, ["Rest", "7km easy", "8x400m at 5:00/km", "Rest", "7km endurance", "Rest", "12km long run"]),
    week(3, 38, ["Rest", "7km easy", "8km endurance", "Rest", "10x400m VO2max 4:50/km", "Rest", "13km long run"]),
    week(4, 28, ["Rest", "6km recovery", "6km easy", "Rest", "5km easy", "Rest", "9km light (recovery week)"]),
    week(5, 42, ["Rest", "8km easy", "5x1000m at 5:10/km", "Rest", "8km endurance", "Rest", "15km long run"]),
    week(6, 45, ["Rest", "8km easy", "6x1000m threshold 5:15/km", "Rest", "9km endurance", "Rest", "16km long run"]),
    week(7, 48, ["Rest", "8km easy", "3x2000m at 5:20/km", "Rest", "10km endurance", "Rest", "18km long run"]),
    week(8, 32, ["Rest", "7km recovery", "6km easy", "Rest", "6km easy", "Rest", "10km light (recovery week)"]),
    week(9, 52, ["Rest", "9km easy", "10x400m VO2max", "Rest", "10km endurance", "Rest", "20km long run 6:00/km"]),
    week(10, 55, ["Rest", "9km easy", "2x3000m threshold 5:20/km", "Rest", "10km endurance", "Rest", "21km long run (race distance!)"]),
    week(11, 58, ["Rest", "10km easy", "15km at half pace 5:30/km", "Rest", "10km endurance", "Rest", "19km long run"]),
    week(12, 38, ["Rest", "7km recovery", "7km easy", "Rest", "7km easy", "Rest", "12km light (recovery week)"]),
    week(13, 52, ["Rest", "9km easy", "3x3000m at 5:20/km", "Rest", "10km endurance", "Rest", "20km long run"]),
    week(14, 48, ["Rest", "8km easy", "18km at goal pace 5:27/km", "Rest", "8km endurance", "Rest", "12km light"]),
    week(15, 38, ["Rest", "7km easy", "6x1000m at 5:10/km", "Rest", "6km easy", "Rest", "10km taper"]),
    week(16, 28, ["Rest", "5km easy", "3km + 5x400m", "Rest", "4km very easy", "Rest", "RACE DAY - goal 1h55!"]),
];

/// Streak statistics for one athlete's plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Number of completed sessions
    pub completed: u32,
    /// Consecutive completed sessions at the end of the recent window
    pub current: u32,
    /// Longest run of consecutive completed sessions
    pub max: u32,
    /// `completed / 112 * 100`, rounded, not clamped
    pub completion_percent: u32,
}
