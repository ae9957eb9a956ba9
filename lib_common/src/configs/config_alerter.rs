//! # Alerter Configuration
//!
//! Runtime configuration for the RSI alerting service. Values resolve in
//! three layers: compiled-in defaults, then an optional JSON config file,
//! then environment variable overrides for the deployment-specific keys
//! (upstream URL, alert address, SMTP relay and credentials).
//!
//! The holiday list is year-specific and must be refreshed in the config
//! file for each new calendar year; nothing here computes holidays.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file picked up from the working directory when no explicit path
/// is given.
const CONFIG_FILE_NAME: &str = "config.alerter.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Unknown exchange time zone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid session window: open minute {open}, close minute {close}")]
    InvalidWindow { open: u32, close: u32 },

    #[error("Invalid value for {key}: {value}")]
    InvalidOverride { key: &'static str, value: String },
}

/// SMTP relay settings for the outbound mail transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub relay: String,
    pub username: String,
    pub password: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            relay: "localhost".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Full configuration surface of the alerter.
///
/// Every field has a compiled-in default so a bare checkout runs without a
/// config file. Missing keys in the file fall back to these defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlerterConfig {
    /// IANA zone identifier of the exchange whose session gates alerting.
    pub exchange_timezone: String,
    /// Session window start, minutes after local midnight (inclusive).
    pub market_open_minute: u32,
    /// Session window end, minutes after local midnight (inclusive).
    pub market_close_minute: u32,
    /// Alert fires when the fetched RSI is strictly below this value.
    pub rsi_threshold: f64,
    /// Upstream endpoint serving the latest RSI reading as JSON.
    pub rsi_api_url: String,
    /// Alert sender and recipient. One address plays both roles.
    pub alert_email: String,
    /// Subject line used for every alert email.
    pub alert_subject: String,
    /// Cron expression (seconds field included) for the in-process schedule.
    pub cron_schedule: String,
    /// Full-day market closures in the exchange's zone, one entry per date.
    pub market_holidays: Vec<NaiveDate>,
    pub smtp: SmtpConfig,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

impl Default for AlerterConfig {
    fn default() -> Self {
        Self {
            exchange_timezone: "America/New_York".to_string(),
            // 09:45 local. The window starts fifteen minutes after the
            // exchange bell, not at the 09:30 open.
            market_open_minute: 9 * 60 + 45,
            market_close_minute: 16 * 60,
            rsi_threshold: 30.0,
            rsi_api_url: "https://main.d1rin969pdam05.amplifyapp.com/api/rsi".to_string(),
            alert_email: "spy-alerts@example.com".to_string(),
            alert_subject: "\u{1F514} SPY RSI Alert: Below 30".to_string(),
            cron_schedule: "0 */5 * * * *".to_string(),
            // NYSE full-day holidays for 2025. Early-close days are not
            // modeled; a half day trades as a full day unless listed here.
            market_holidays: vec![
                ymd(2025, 1, 1),   // New Year's Day
                ymd(2025, 1, 20),  // Martin Luther King, Jr. Day
                ymd(2025, 2, 17),  // Presidents' Day
                ymd(2025, 4, 18),  // Good Friday
                ymd(2025, 5, 26),  // Memorial Day
                ymd(2025, 7, 4),   // Independence Day
                ymd(2025, 9, 1),   // Labor Day
                ymd(2025, 11, 27), // Thanksgiving Day
                ymd(2025, 12, 25), // Christmas Day
            ],
            smtp: SmtpConfig::default(),
        }
    }
}

impl AlerterConfig {
    /// Resolves the configuration: defaults, then the JSON file (explicit
    /// path, or `config.alerter.json` beside the process if present), then
    /// environment overrides. Validation runs on the final result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let candidate: Option<PathBuf> = match path {
            Some(explicit) => Some(explicit.to_path_buf()),
            None => {
                let fallback = PathBuf::from(CONFIG_FILE_NAME);
                fallback.is_file().then_some(fallback)
            }
        };

        let mut config = match candidate {
            Some(file) => {
                let contents = fs::read_to_string(&file)?;
                serde_json::from_str(&contents)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies process-environment overrides for the deployment keys.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.override_from(|key| env::var(key).ok())
    }

    // Separated from the environment so the layering is testable without
    // mutating process-global state.
    fn override_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("RSI_API_URL") {
            self.rsi_api_url = url;
        }
        if let Some(address) = lookup("ALERT_EMAIL") {
            self.alert_email = address;
        }
        if let Some(raw) = lookup("RSI_THRESHOLD") {
            self.rsi_threshold = raw.parse().map_err(|_| ConfigError::InvalidOverride {
                key: "RSI_THRESHOLD",
                value: raw,
            })?;
        }
        if let Some(relay) = lookup("SMTP_RELAY") {
            self.smtp.relay = relay;
        }
        if let Some(username) = lookup("SMTP_USERNAME") {
            self.smtp.username = username;
        }
        if let Some(password) = lookup("SMTP_PASSWORD") {
            self.smtp.password = password;
        }
        Ok(())
    }

    /// Parses the configured exchange zone identifier.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.exchange_timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.exchange_timezone.clone()))
    }

    /// Holiday list as a unique, ordered date set.
    pub fn holiday_set(&self) -> BTreeSet<NaiveDate> {
        self.market_holidays.iter().copied().collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.timezone()?;
        if self.market_open_minute > self.market_close_minute
            || self.market_close_minute >= 24 * 60
        {
            return Err(ConfigError::InvalidWindow {
                open: self.market_open_minute,
                close: self.market_close_minute,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_describe_the_nyse_session() {
        let config = AlerterConfig::default();
        assert_eq!(config.exchange_timezone, "America/New_York");
        assert_eq!(config.market_open_minute, 585);
        assert_eq!(config.market_close_minute, 960);
        assert_eq!(config.rsi_threshold, 30.0);
        assert_eq!(config.market_holidays.len(), 9);
        assert!(config.timezone().is_ok());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "rsi_threshold": 25.5, "market_holidays": ["2026-01-01", "2026-12-25"] }}"#
        )
        .expect("write config");

        let config = AlerterConfig::load(Some(file.path())).expect("load config");
        assert_eq!(config.rsi_threshold, 25.5);
        assert_eq!(config.market_holidays.len(), 2);
        // Untouched keys keep their defaults.
        assert_eq!(config.market_open_minute, 585);
        assert_eq!(config.exchange_timezone, "America/New_York");
    }

    #[test]
    fn environment_wins_over_defaults() {
        let mut config = AlerterConfig::default();
        config
            .override_from(|key| match key {
                "RSI_API_URL" => Some("https://indicators.internal/api/rsi".to_string()),
                "ALERT_EMAIL" => Some("desk@example.com".to_string()),
                "SMTP_RELAY" => Some("smtp.example.com".to_string()),
                _ => None,
            })
            .expect("overrides apply");

        assert_eq!(config.rsi_api_url, "https://indicators.internal/api/rsi");
        assert_eq!(config.alert_email, "desk@example.com");
        assert_eq!(config.smtp.relay, "smtp.example.com");
    }

    #[test]
    fn malformed_threshold_override_is_rejected() {
        let mut config = AlerterConfig::default();
        let result = config.override_from(|key| {
            (key == "RSI_THRESHOLD").then(|| "not-a-number".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride { key: "RSI_THRESHOLD", .. })
        ));
    }

    #[test]
    fn unknown_timezone_fails_validation() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "exchange_timezone": "America/Atlantis" }}"#).expect("write config");
        let result = AlerterConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::UnknownTimezone(_))));
    }

    #[test]
    fn inverted_window_fails_validation() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "market_open_minute": 1000, "market_close_minute": 585 }}"#
        )
        .expect("write config");
        let result = AlerterConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::InvalidWindow { .. })));
    }

    #[test]
    fn holiday_set_deduplicates() {
        let mut config = AlerterConfig::default();
        config.market_holidays.push(ymd(2025, 7, 4));
        assert_eq!(config.holiday_set().len(), 9);
    }
}
