// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Classifier tuning constants.
//!
//! The hysteresis rule is "K of the last M samples": entering
//! [`Throttling`](crate::ThermalState::Throttling) needs `required_samples`
//! hot samples within the newest `window_samples`, and leaving it needs the
//! same number of clear samples.
//!
//! # TOML Format
//! ```toml
//! high_temp_c = 90.0
//! freq_drop_ratio = 0.6
//! window_samples = 5
//! required_samples = 3
//! history_capacity = 30
//! window_max_age_ms = 30000
//! ```

use crate::ClassifierError;
use std::time::Duration;

/// Temperature above which a sample counts as hot (°C).
pub const DEFAULT_HIGH_TEMP_C: f64 = 90.0;

/// `current / base` clock ratio below which a sample counts as throttled.
pub const DEFAULT_FREQ_DROP_RATIO: f64 = 0.6;

/// Hysteresis window length (M).
pub const DEFAULT_WINDOW_SAMPLES: usize = 5;

/// Samples within the window required to change state (K).
pub const DEFAULT_REQUIRED_SAMPLES: usize = 3;

/// Snapshots retained in history: 60 s at the default 2 s interval.
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Samples older than this, relative to the newest, never enter the window.
pub const DEFAULT_WINDOW_MAX_AGE_MS: u64 = 30_000;

/// Thresholds and hysteresis parameters for [`Classifier`](crate::Classifier).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// High-temperature threshold in °C (strictly exceeded to fire).
    pub high_temp_c: f64,
    /// Clock drop ratio in `(0, 1]` (strictly undercut to fire).
    pub freq_drop_ratio: f64,
    /// Window length M.
    pub window_samples: usize,
    /// Required count K.
    pub required_samples: usize,
    /// History buffer capacity N.
    pub history_capacity: usize,
    /// Maximum age of a window sample relative to the newest one.
    pub window_max_age_ms: u64,
}

impl ClassifierConfig {
    /// Checks that the constants describe a usable hysteresis rule.
    ///
    /// `2K > M` is required so that the "enter" and "leave" conditions can
    /// never both hold for the same window.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let invalid = |msg: String| Err(ClassifierError::InvalidConfig(msg));

        if !self.high_temp_c.is_finite() || self.high_temp_c <= 0.0 {
            return invalid(format!(
                "high_temp_c must be a positive temperature, got {}",
                self.high_temp_c
            ));
        }
        if !(self.freq_drop_ratio > 0.0 && self.freq_drop_ratio <= 1.0) {
            return invalid(format!(
                "freq_drop_ratio must be in (0, 1], got {}",
                self.freq_drop_ratio
            ));
        }
        if self.required_samples == 0 {
            return invalid("required_samples must be at least 1".into());
        }
        if self.required_samples > self.window_samples {
            return invalid(format!(
                "required_samples ({}) exceeds window_samples ({})",
                self.required_samples, self.window_samples
            ));
        }
        if 2 * self.required_samples <= self.window_samples {
            return invalid(format!(
                "required_samples ({}) must be a strict majority of window_samples ({})",
                self.required_samples, self.window_samples
            ));
        }
        if self.window_samples > self.history_capacity {
            return invalid(format!(
                "window_samples ({}) exceeds history_capacity ({})",
                self.window_samples, self.history_capacity
            ));
        }
        if self.window_max_age_ms == 0 {
            return invalid("window_max_age_ms must be positive".into());
        }
        Ok(())
    }

    /// [`Self::window_max_age_ms`] as a [`Duration`].
    pub fn window_max_age(&self) -> Duration {
        Duration::from_millis(self.window_max_age_ms)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            high_temp_c: DEFAULT_HIGH_TEMP_C,
            freq_drop_ratio: DEFAULT_FREQ_DROP_RATIO,
            window_samples: DEFAULT_WINDOW_SAMPLES,
            required_samples: DEFAULT_REQUIRED_SAMPLES,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            window_max_age_ms: DEFAULT_WINDOW_MAX_AGE_MS,
        }
    }
}
