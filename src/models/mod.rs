// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod badge;
pub mod stats;
pub mod training;
pub mod user;

pub use activity::{ActivityRecord, ActivityStreams, Split, StravaActivity};
pub use badge::{Badge, BadgeBoard, BadgeCategory};
pub use stats::{PersonalRecords, RacePredictions, WeeklyBucket, WeeklySummary};
pub use training::{DayKey, StreakSummary, TrainingProgress};
pub use user::{Athlete, TokenBundle};
