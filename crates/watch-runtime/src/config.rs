// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Monitor configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! interval_ms = 2000
//! event_log = "/var/log/thermal-watch/events.jsonl"
//!
//! [classifier]
//! high_temp_c = 90.0
//! freq_drop_ratio = 0.6
//! window_samples = 5
//! required_samples = 3
//!
//! [alert]
//! command = "gh-yule-log"
//! args = []
//! grace_period_ms = 200
//! clear_screen_on_stop = true
//! ```
//!
//! Every key is optional.

use crate::WatchError;
use classifier::ClassifierConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default poll interval.
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Default alert animation binary.
pub const DEFAULT_ALERT_COMMAND: &str = "gh-yule-log";

/// Default time an alert process gets to exit after `SIGINT`.
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 200;

/// Configuration for the thermal monitor.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Poll interval in milliseconds.
    pub interval_ms: u64,
    /// Event log path. [`default_event_log_path`] when unset.
    pub event_log: Option<PathBuf>,
    /// Thresholds and hysteresis.
    pub classifier: ClassifierConfig,
    /// Alert process settings.
    pub alert: AlertConfig,
}

/// Settings for the external alert process.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Program to run while throttling.
    pub command: String,
    /// Arguments passed to `command`.
    pub args: Vec<String>,
    /// Time between `SIGINT` and a forced kill.
    pub grace_period_ms: u64,
    /// Clear the terminal after the alert exits.
    pub clear_screen_on_stop: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_ALERT_COMMAND.to_string(),
            args: Vec::new(),
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            clear_screen_on_stop: true,
        }
    }
}

impl AlertConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

impl WatchConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, WatchError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WatchError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, WatchError> {
        toml::from_str(toml_str).map_err(|e| WatchError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, WatchError> {
        toml::to_string_pretty(self)
            .map_err(|e| WatchError::Config(format!("TOML serialise error: {e}")))
    }

    /// Checks the interval, alert command and classifier constants.
    pub fn validate(&self) -> Result<(), WatchError> {
        if self.interval_ms == 0 {
            return Err(WatchError::Config("interval_ms must be positive".into()));
        }
        if self.alert.command.trim().is_empty() {
            return Err(WatchError::Config("alert.command must not be empty".into()));
        }
        self.classifier.validate()?;

        // K samples span K-1 intervals and must all fit within the window age.
        let span_ms = self
            .interval_ms
            .saturating_mul(self.classifier.required_samples.saturating_sub(1) as u64);
        if span_ms > self.classifier.window_max_age_ms {
            return Err(WatchError::Config(format!(
                "interval_ms {} is too long: {} samples span {span_ms} ms, \
                 beyond window_max_age_ms {}",
                self.interval_ms, self.classifier.required_samples, self.classifier.window_max_age_ms,
            )));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// The configured event log path, or the per-user default.
    pub fn resolve_event_log(&self) -> PathBuf {
        self.event_log.clone().unwrap_or_else(default_event_log_path)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            event_log: None,
            classifier: ClassifierConfig::default(),
            alert: AlertConfig::default(),
        }
    }
}

/// `$HOME/.thermal-watch/events.jsonl`, or `./thermal-watch-events.jsonl`
/// when `HOME` is not set.
pub fn default_event_log_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => {
            PathBuf::from(home).join(".thermal-watch").join("events.jsonl")
        }
        _ => PathBuf::from("thermal-watch-events.jsonl"),
    }
}
