use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::jam::ControlPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Limits and defaults for Jam rooms
#[derive(Debug, Clone)]
pub struct JamConfig {
    pub max_members: usize,
    pub channel_capacity: usize,
    pub default_policy: ControlPolicy,
}

impl Default for JamConfig {
    fn default() -> Self {
        Self {
            max_members: 50,
            channel_capacity: 100,
            default_policy: ControlPolicy::Everyone,
        }
    }
}

/// Application configuration, read from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub youtube_api_key: Option<String>,
    pub google_client_id: Option<String>,
    pub jwt_secret: String,
    pub session_expiration_days: i64,
    pub music_file_path: PathBuf,
    pub search_max_results: u8,
    pub jam: JamConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: None,
            youtube_api_key: None,
            google_client_id: None,
            jwt_secret: "your-secret-key-change-in-production".to_string(),
            session_expiration_days: 30,
            music_file_path: PathBuf::from("music/sample.mp3"),
            search_max_results: 10,
            jam: JamConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            database_url: get("DATABASE_URL"),
            youtube_api_key: get("YOUTUBE_API_KEY").or_else(|| get("YT")),
            google_client_id: get("GOOGLE_CLIENT_ID"),
            jwt_secret: get("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            session_expiration_days: parse_or(
                "SESSION_EXPIRATION_DAYS",
                get("SESSION_EXPIRATION_DAYS"),
                defaults.session_expiration_days,
            )?,
            music_file_path: get("MUSIC_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.music_file_path),
            search_max_results: parse_or(
                "SEARCH_MAX_RESULTS",
                get("SEARCH_MAX_RESULTS"),
                defaults.search_max_results,
            )?,
            jam: JamConfig {
                max_members: parse_or(
                    "JAM_MAX_MEMBERS",
                    get("JAM_MAX_MEMBERS"),
                    defaults.jam.max_members,
                )?,
                channel_capacity: parse_or(
                    "JAM_CHANNEL_CAPACITY",
                    get("JAM_CHANNEL_CAPACITY"),
                    defaults.jam.channel_capacity,
                )?,
                default_policy: parse_or(
                    "JAM_DEFAULT_POLICY",
                    get("JAM_DEFAULT_POLICY"),
                    defaults.jam.default_policy,
                )?,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}
