//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. Secrets come from the environment
//! (or a local `.env` file during development).

use crate::analytics::streaks::StreakOrder;
use chrono::NaiveDate;
use std::env;

/// Default Strava REST API base URL.
pub const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
/// Default Strava OAuth base URL.
pub const DEFAULT_STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Frontend URL for OAuth redirects
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Strava REST API base URL (overridable for tests)
    pub strava_api_url: String,
    /// Strava OAuth base URL (overridable for tests)
    pub strava_oauth_url: String,
    /// `per_page` used when fetching activity history
    pub activity_page_size: u32,
    /// Maximum number of history pages fetched per request
    pub max_activity_pages: u32,
    /// Race day the 16-week plan counts down to
    pub race_date: NaiveDate,
    /// Key ordering used by the streak tracker
    pub streak_order: StreakOrder,

    // --- Secrets ---
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            strava_api_url: DEFAULT_STRAVA_API_URL.to_string(),
            strava_oauth_url: DEFAULT_STRAVA_OAUTH_URL.to_string(),
            activity_page_size: 200,
            max_activity_pages: 5,
            race_date: default_race_date(),
            streak_order: StreakOrder::Lexicographic,
            strava_client_secret: "test_secret".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();

        let oauth_state_key = env::var("OAUTH_STATE_KEY")
            .map(|v| v.trim().as_bytes().to_vec())
            .unwrap_or_else(|_| jwt_signing_key.clone());

        let race_date = match env::var("RACE_DATE") {
            Ok(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| ConfigError::Invalid("RACE_DATE", raw))?,
            Err(_) => default_race_date(),
        };

        let streak_order = match env::var("STREAK_ORDER") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("STREAK_ORDER", raw))?,
            Err(_) => StreakOrder::Lexicographic,
        };

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_or("PORT", 8080),
            strava_api_url: env::var("STRAVA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STRAVA_OAUTH_URL.to_string()),
            activity_page_size: parse_or("ACTIVITY_PAGE_SIZE", 200),
            max_activity_pages: parse_or("MAX_ACTIVITY_PAGES", 5),
            race_date,
            streak_order,

            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            jwt_signing_key,
            oauth_state_key,
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn default_race_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 2).unwrap_or_default()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("STRAVA_CLIENT_ID", "test_id");
        env::set_var("STRAVA_CLIENT_SECRET", "test_secret");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("RACE_DATE", "2027-04-11");
        env::set_var("STREAK_ORDER", "chronological");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.strava_client_id, "test_id");
        assert_eq!(config.strava_client_secret, "test_secret");
        assert_eq!(config.port, 8080);
        assert_eq!(config.activity_page_size, 200);
        assert_eq!(
            config.race_date,
            NaiveDate::from_ymd_opt(2027, 4, 11).unwrap()
        );
        assert_eq!(config.streak_order, StreakOrder::Chronological);
    }

    #[test]
    fn test_secure_cookies_follow_frontend_scheme() {
        let mut config = Config::test_default();
        assert!(!config.secure_cookies());

        config.frontend_url = "https://stride.example.com".to_string();
        assert!(config.secure_cookies());
    }
}
