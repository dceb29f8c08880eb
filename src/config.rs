//! Console Settings
//!
//! Defaults compiled in, optionally overridden by a JSON object stored in
//! local storage under [`SETTINGS_KEY`].

use std::sync::OnceLock;

use gloo_storage::{LocalStorage, Storage};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Local storage key holding settings overrides
pub const SETTINGS_KEY: &str = "admin_console_config";

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for every API path, without trailing slash
    pub api_base: String,
    /// Local storage key of the bearer token
    pub token_key: String,
    /// Delay before each task status check
    pub poll_interval_ms: u32,
    /// Task status checks before giving up
    pub poll_max_attempts: u32,
    /// Tracking records fetched per post
    pub tracking_limit: u32,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            token_key: "admin_token".to_string(),
            poll_interval_ms: 1000,
            poll_max_attempts: 15,
            tracking_limit: 100,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    /// Read overrides from local storage, falling back to defaults
    fn load() -> Self {
        match LocalStorage::get::<AppConfig>(SETTINGS_KEY) {
            Ok(cfg) => cfg.normalized(),
            Err(_) => Self::default(),
        }
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base.trim_end_matches('/').to_string();
        self.api_base = trimmed;
        if self.poll_max_attempts == 0 {
            self.poll_max_attempts = 1;
        }
        self
    }

    /// Join the API base with a path that starts with `/`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

/// Load settings once at startup
pub fn init() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::load)
}

/// Current settings (defaults if `init` never ran)
pub fn get() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"poll_max_attempts": 30}"#).unwrap();
        assert_eq!(cfg.poll_max_attempts, 30);
        assert_eq!(cfg.poll_interval_ms, 1000);
        assert_eq!(cfg.api_base, "/api");
        assert_eq!(cfg.token_key, "admin_token");
    }

    #[test]
    fn normalized_strips_trailing_slash() {
        let cfg = AppConfig {
            api_base: "https://bot.example/api/".to_string(),
            poll_max_attempts: 0,
            ..AppConfig::default()
        }
        .normalized();
        assert_eq!(cfg.api_url("/stats"), "https://bot.example/api/stats");
        assert_eq!(cfg.poll_max_attempts, 1);
    }

    #[test]
    fn log_level_parses_from_json() {
        let cfg: AppConfig = serde_json::from_str(r#"{"log_level": "debug"}"#).unwrap();
        assert_eq!(cfg.log_level, LevelFilter::Debug);
    }
}
