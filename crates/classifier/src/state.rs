// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Classification states and results.

use std::fmt;

/// Operating condition of the machine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ThermalState {
    /// No sustained throttling signal.
    #[default]
    Normal,
    /// Sustained high temperature or reduced clock.
    Throttling,
}

impl ThermalState {
    pub fn name(self) -> &'static str {
        match self {
            ThermalState::Normal => "Normal",
            ThermalState::Throttling => "Throttling",
        }
    }
}

impl fmt::Display for ThermalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A throttling condition that fired for one sample.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Temperature exceeded the high threshold.
    Temperature { celsius: f64, threshold: f64 },
    /// Clock fell below the drop ratio of its base clock.
    FrequencyRatio {
        current_mhz: f64,
        base_mhz: f64,
        ratio: f64,
        threshold: f64,
    },
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Temperature { celsius, threshold } => {
                write!(f, "temperature {celsius:.1}°C above {threshold:.1}°C")
            }
            Trigger::FrequencyRatio {
                current_mhz,
                base_mhz,
                ratio,
                threshold,
            } => write!(
                f,
                "clock {current_mhz:.0}/{base_mhz:.0} MHz ({:.0}%) below {:.0}% of base",
                ratio * 100.0,
                threshold * 100.0,
            ),
        }
    }
}

/// Outcome of evaluating the throttling predicate on a single snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleVerdict {
    /// At least one condition fired.
    Hot(Vec<Trigger>),
    /// Usable readings, none fired.
    Clear,
    /// Neither temperature nor a frequency ratio was usable.
    Unknown,
}

/// Verdict counts over the hysteresis window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct WindowTally {
    pub hot: usize,
    pub clear: usize,
    pub unknown: usize,
    /// Number of samples in the window.
    pub size: usize,
}

impl WindowTally {
    /// Samples that carried at least one usable signal.
    pub fn usable(&self) -> usize {
        self.hot + self.clear
    }
}

/// Result of one [`Classifier::classify`](crate::Classifier::classify) call.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClassificationResult {
    pub state: ThermalState,
    /// Human-readable explanation.
    pub reason: String,
    /// Conditions from the newest hot sample in the window.
    pub triggers: Vec<Trigger>,
    /// `true` if `state` differs from the previous call's state.
    pub changed: bool,
    pub window: WindowTally,
}
