// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training-plan completion streaks.
//!
//! Keys are ordered as strings by default, so `w10d0` sorts before `w2d0`.
//! [`StreakOrder::Chronological`] orders by parsed `(week, day)` instead.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::training::PLAN_SLOTS;
use crate::models::{DayKey, StreakSummary, TrainingProgress};

/// Number of most recent keys the current streak is taken from.
pub const RECENT_WINDOW: usize = 30;

/// How day keys are ordered before streaks are scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreakOrder {
    /// Plain key-string order.
    #[default]
    Lexicographic,
    /// Parsed `(week, day)` order; unparseable keys sort last.
    Chronological,
}

impl FromStr for StreakOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicographic" => Ok(StreakOrder::Lexicographic),
            "chronological" => Ok(StreakOrder::Chronological),
            other => Err(format!(
                "unknown streak order '{other}' (expected lexicographic or chronological)"
            )),
        }
    }
}

impl fmt::Display for StreakOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreakOrder::Lexicographic => f.write_str("lexicographic"),
            StreakOrder::Chronological => f.write_str("chronological"),
        }
    }
}

/// Streak summary using key-string order.
pub fn compute_streaks(progress: &TrainingProgress) -> StreakSummary {
    compute_streaks_with_order(progress, StreakOrder::Lexicographic)
}

/// Streak summary using the given key order.
pub fn compute_streaks_with_order(progress: &TrainingProgress, order: StreakOrder) -> StreakSummary {
    let flags = ordered_flags(progress, order);
    let completed = flags.iter().filter(|done| **done).count() as u32;

    let mut max = 0u32;
    let mut run = 0u32;
    for done in &flags {
        if *done {
            run += 1;
            max = max.max(run);
        } else {
            run = 0;
        }
    }

    let window = &flags[flags.len().saturating_sub(RECENT_WINDOW)..];
    let current = window.iter().rev().take_while(|done| **done).count() as u32;

    StreakSummary {
        completed,
        current,
        max,
        completion_percent: completion_percent(completed),
    }
}

/// `completed / 112 * 100`, rounded to the nearest integer.
pub fn completion_percent(completed: u32) -> u32 {
    (f64::from(completed) / f64::from(PLAN_SLOTS) * 100.0).round() as u32
}

fn ordered_flags(progress: &TrainingProgress, order: StreakOrder) -> Vec<bool> {
    match order {
        // BTreeMap<String, _> already iterates in key-string order
        StreakOrder::Lexicographic => progress.values().copied().collect(),
        StreakOrder::Chronological => {
            let mut entries: Vec<(Option<DayKey>, &str, bool)> = progress
                .iter()
                .map(|(key, done)| (key.parse::<DayKey>().ok(), key.as_str(), *done))
                .collect();
            entries.sort_by(|a, b| match (&a.0, &b.0) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.1.cmp(b.1),
            });
            entries.into_iter().map(|(_, _, done)| done).collect()
        }
    }
}
