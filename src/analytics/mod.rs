// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived-metrics engines.
//!
//! Every function in here is pure: it takes normalized activity records
//! (or a progress map) and returns a value. Non-run activities are ignored
//! by each engine, and empty inputs yield well-defined defaults.

pub mod badges;
pub mod pace;
pub mod predictions;
pub mod program;
pub mod records;
pub mod splits;
pub mod streaks;
pub mod weekly;

pub use badges::compute_badges;
pub use predictions::compute_predictions;
pub use records::compute_records;
pub use streaks::compute_streaks;
pub use weekly::compute_weekly_aggregates;

use crate::models::ActivityRecord;

/// Iterate over the runs in an activity list.
pub fn runs(activities: &[ActivityRecord]) -> impl Iterator<Item = &ActivityRecord> {
    activities.iter().filter(|a| a.is_run())
}
