// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory stores keyed by Strava athlete ID.
//!
//! Holds:
//! - Athletes (profile from the token exchange)
//! - Tokens (OAuth bundle per athlete)
//! - Training progress (plan completion flags)
//!
//! Nothing is persisted; everything lives for the process lifetime.

use std::sync::Arc;

use dashmap::DashMap;

use crate::models::{Athlete, DayKey, TokenBundle, TrainingProgress};

/// Process-wide store. Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryDb {
    athletes: Arc<DashMap<u64, Athlete>>,
    tokens: Arc<DashMap<u64, TokenBundle>>,
    progress: Arc<DashMap<u64, TrainingProgress>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Athlete Operations ──────────────────────────────────────

    pub fn get_athlete(&self, athlete_id: u64) -> Option<Athlete> {
        self.athletes.get(&athlete_id).map(|a| a.clone())
    }

    /// Create or replace an athlete profile.
    pub fn upsert_athlete(&self, athlete: Athlete) {
        self.athletes.insert(athlete.id, athlete);
    }

    // ─── Token Operations ────────────────────────────────────────

    pub fn get_tokens(&self, athlete_id: u64) -> Option<TokenBundle> {
        self.tokens.get(&athlete_id).map(|t| t.clone())
    }

    pub fn set_tokens(&self, athlete_id: u64, tokens: TokenBundle) {
        self.tokens.insert(athlete_id, tokens);
    }

    /// Drop stored tokens (logout). Returns whether any were stored.
    pub fn delete_tokens(&self, athlete_id: u64) -> bool {
        self.tokens.remove(&athlete_id).is_some()
    }

    // ─── Training Progress Operations ────────────────────────────

    /// Snapshot of an athlete's progress map (empty when never toggled).
    pub fn get_progress(&self, athlete_id: u64) -> TrainingProgress {
        self.progress
            .get(&athlete_id)
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Whether a session is marked done. Unknown keys are not.
    pub fn is_session_completed(&self, athlete_id: u64, key: &DayKey) -> bool {
        self.progress
            .get(&athlete_id)
            .and_then(|p| p.get(&key.to_string()).copied())
            .unwrap_or(false)
    }

    /// Flip a session flag and return the new value.
    ///
    /// The athlete's map and the key are created on first use, so the first
    /// toggle of a key yields `true`. The flip happens under the shard lock.
    pub fn toggle_session(&self, athlete_id: u64, key: &DayKey) -> bool {
        let mut progress = self.progress.entry(athlete_id).or_default();
        let flag = progress.entry(key.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }
}
