//! Athlete profile and OAuth token bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Athlete profile returned by the Strava token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    /// Strava athlete ID
    pub id: u64,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    /// Profile picture URL
    pub profile: Option<String>,
}

/// OAuth tokens for one athlete, kept in memory for the process lifetime.
#[derive(Debug, Clone)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}
