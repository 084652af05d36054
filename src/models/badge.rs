// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Badge and achievement models.

use serde::{Deserialize, Serialize};

/// Badge family. Each category unlocks at most one badge at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Distance,
    RunCount,
    Pace,
    LongRun,
    Regularity,
}

impl BadgeCategory {
    /// Evaluation order used for the unlocked and locked lists.
    pub const ALL: [BadgeCategory; 5] = [
        BadgeCategory::Distance,
        BadgeCategory::RunCount,
        BadgeCategory::Pace,
        BadgeCategory::LongRun,
        BadgeCategory::Regularity,
    ];
}

/// A badge, either unlocked or still locked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub category: BadgeCategory,
    /// Tier within the category (1..=3)
    pub tier: u8,
    /// Threshold in the category's unit (km, runs, min/km, meters, runs/week)
    pub threshold: f64,
    pub icon: String,
    pub name: String,
    pub description: String,
    /// Current stats for unlocked badges, remaining progress for locked ones
    pub progress: String,
}

/// Result of badge evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BadgeBoard {
    pub unlocked: Vec<Badge>,
    pub locked: Vec<Badge>,
}
