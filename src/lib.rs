// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stride Tracker: running analytics on top of Strava
//!
//! This crate provides the backend API that fetches an athlete's Strava
//! history and derives training metrics from it: weekly volume, personal
//! records, race predictions, badges, and a 16-week plan tracker.

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::MemoryDb;
use services::StravaService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: MemoryDb,
    pub strava_service: StravaService,
}
