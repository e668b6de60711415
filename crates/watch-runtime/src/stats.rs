// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-session monitoring statistics.

use classifier::{ClassificationResult, ThermalState};
use sensors::Snapshot;

/// Aggregates over one monitoring session.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SessionStats {
    /// Poll ticks processed.
    pub ticks: u64,
    /// State changes observed.
    pub transitions: u64,
    /// Ticks that ended in [`ThermalState::Throttling`].
    pub throttling_ticks: u64,
    /// Ticks whose snapshot had no valid temperature or frequency ratio.
    pub blind_ticks: u64,
    /// Highest valid temperature seen (°C).
    pub peak_temp_c: Option<f64>,
    /// Lowest valid `current / base` clock ratio seen.
    pub min_freq_ratio: Option<f64>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one tick.
    pub fn record(&mut self, snapshot: &Snapshot, result: &ClassificationResult) {
        self.ticks += 1;
        if result.changed {
            self.transitions += 1;
        }
        if result.state == ThermalState::Throttling {
            self.throttling_ticks += 1;
        }

        let temp = snapshot.valid_temperature();
        let ratio = snapshot.valid_frequency_ratio();
        if temp.is_none() && ratio.is_none() {
            self.blind_ticks += 1;
        }
        if let Some(t) = temp {
            self.peak_temp_c = Some(self.peak_temp_c.map_or(t, |p| p.max(t)));
        }
        if let Some(r) = ratio {
            self.min_freq_ratio = Some(self.min_freq_ratio.map_or(r, |m| m.min(r)));
        }
    }

    /// Fraction of ticks spent throttling, in `[0.0, 1.0]`.
    pub fn throttling_fraction(&self) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.throttling_ticks as f64 / self.ticks as f64
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let peak = self
            .peak_temp_c
            .map_or_else(|| "n/a".to_string(), |t| format!("{t:.1}°C"));
        let ratio = self
            .min_freq_ratio
            .map_or_else(|| "n/a".to_string(), |r| format!("{:.0}%", r * 100.0));
        format!(
            "Session: {} samples, {} transitions, throttling {:.0}% of the time, \
             peak temp {peak}, lowest clock {ratio} of base, {} samples without data",
            self.ticks,
            self.transitions,
            self.throttling_fraction() * 100.0,
            self.blind_ticks,
        )
    }
}
