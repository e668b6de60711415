// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Point-in-time sensor snapshot.
//!
//! A [`Snapshot`] bundles one poll tick's readings. Every reading is
//! individually optional, and a reading may only be trusted when its
//! [`Signal`] is present in [`Snapshot::valid_signals`]. The `valid_*`
//! accessors enforce that rule; classification code should never read the
//! raw fields directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A hardware signal that a snapshot may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// CPU temperature in degrees Celsius.
    TempC,
    /// Current CPU clock in MHz.
    FreqMHz,
    /// Nominal (rated) CPU clock in MHz.
    BaseFreqMHz,
    /// CPU load as a percentage of all online cores.
    LoadPercent,
}

impl Signal {
    /// All signals, in display order.
    pub const ALL: [Signal; 4] = [
        Signal::TempC,
        Signal::FreqMHz,
        Signal::BaseFreqMHz,
        Signal::LoadPercent,
    ];

    /// Stable name used in logs and serialised snapshots.
    pub fn name(self) -> &'static str {
        match self {
            Signal::TempC => "TempC",
            Signal::FreqMHz => "FreqMHz",
            Signal::BaseFreqMHz => "BaseFreqMHz",
            Signal::LoadPercent => "LoadPercent",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of signals that were successfully read in one sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalSet(BTreeSet<Signal>);

impl SignalSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a signal as valid. Returns `false` if it was already present.
    pub fn insert(&mut self, signal: Signal) -> bool {
        self.0.insert(signal)
    }

    /// Returns `true` if the signal was read successfully.
    pub fn contains(&self, signal: Signal) -> bool {
        self.0.contains(&signal)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the valid signals in display order.
    pub fn iter(&self) -> impl Iterator<Item = Signal> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Signal> for SignalSet {
    fn from_iter<I: IntoIterator<Item = Signal>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One timestamped bundle of sensor readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unix timestamp in milliseconds when the sample was taken.
    pub timestamp_ms: u64,
    /// CPU temperature in degrees Celsius.
    pub temperature_c: Option<f64>,
    /// Current CPU clock in MHz.
    pub frequency_mhz: Option<f64>,
    /// Nominal CPU clock in MHz.
    pub base_frequency_mhz: Option<f64>,
    /// CPU load in `[0, 100]` percent.
    pub load_percent: Option<f64>,
    /// Signals that were successfully read for this sample.
    pub valid_signals: SignalSet,
}

impl Snapshot {
    /// A snapshot with no readings at the given time.
    pub fn empty(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            temperature_c: None,
            frequency_mhz: None,
            base_frequency_mhz: None,
            load_percent: None,
            valid_signals: SignalSet::new(),
        }
    }

    /// Sets the temperature and marks it valid.
    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature_c = Some(celsius);
        self.valid_signals.insert(Signal::TempC);
        self
    }

    /// Sets current and base frequency and marks both valid.
    pub fn with_frequency(mut self, current_mhz: f64, base_mhz: f64) -> Self {
        self.frequency_mhz = Some(current_mhz);
        self.base_frequency_mhz = Some(base_mhz);
        self.valid_signals.insert(Signal::FreqMHz);
        self.valid_signals.insert(Signal::BaseFreqMHz);
        self
    }

    /// Sets the load and marks it valid. The value is clamped to `[0, 100]`.
    pub fn with_load(mut self, percent: f64) -> Self {
        self.load_percent = Some(percent.clamp(0.0, 100.0));
        self.valid_signals.insert(Signal::LoadPercent);
        self
    }

    /// Returns `true` if `signal` was read successfully.
    pub fn is_valid(&self, signal: Signal) -> bool {
        self.valid_signals.contains(signal)
    }

    /// Temperature, only if the `TempC` signal is valid.
    pub fn valid_temperature(&self) -> Option<f64> {
        gate(self.temperature_c, self.is_valid(Signal::TempC))
    }

    /// Current and base clock, only if both frequency signals are valid.
    pub fn valid_frequencies(&self) -> Option<(f64, f64)> {
        let cur = gate(self.frequency_mhz, self.is_valid(Signal::FreqMHz))?;
        let base = gate(self.base_frequency_mhz, self.is_valid(Signal::BaseFreqMHz))?;
        Some((cur, base))
    }

    /// `current / base` clock ratio, only if both frequency signals are valid
    /// and the base clock is positive.
    pub fn valid_frequency_ratio(&self) -> Option<f64> {
        let (cur, base) = self.valid_frequencies()?;
        if base <= 0.0 {
            return None;
        }
        Some(cur / base)
    }

    /// Load percentage, only if the `LoadPercent` signal is valid.
    pub fn valid_load(&self) -> Option<f64> {
        gate(self.load_percent, self.is_valid(Signal::LoadPercent))
    }

    /// Returns a one-line summary suitable for logging or CLI display.
    ///
    /// # Example output
    /// ```text
    /// Temp 54.3°C, Clock 2800/3000 MHz (93%), Load 12%
    /// ```
    pub fn summary(&self) -> String {
        let temp = match self.valid_temperature() {
            Some(t) => format!("{t:.1}°C"),
            None => "n/a".to_string(),
        };
        let clock = match (self.valid_frequencies(), self.valid_frequency_ratio()) {
            (Some((cur, base)), Some(ratio)) => {
                format!("{cur:.0}/{base:.0} MHz ({:.0}%)", ratio * 100.0)
            }
            _ => "n/a".to_string(),
        };
        let load = match self.valid_load() {
            Some(l) => format!("{l:.0}%"),
            None => "n/a".to_string(),
        };
        format!("Temp {temp}, Clock {clock}, Load {load}")
    }
}

fn gate(value: Option<f64>, valid: bool) -> Option<f64> {
    if valid {
        value.filter(|v| v.is_finite())
    } else {
        None
    }
}

/// Current Unix time in milliseconds (0 if the clock is before the epoch).
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_marks_signals_valid() {
        let snap = Snapshot::empty(1)
            .with_temperature(55.0)
            .with_frequency(2800.0, 3000.0)
            .with_load(40.0);
        assert_eq!(snap.valid_signals.len(), 4);
        assert_eq!(snap.valid_temperature(), Some(55.0));
        assert_eq!(snap.valid_load(), Some(40.0));
        let ratio = snap.valid_frequency_ratio().unwrap();
        assert!((ratio - 2800.0 / 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_placeholder_not_trusted() {
        let mut snap = Snapshot::empty(1);
        snap.temperature_c = Some(99.0);
        snap.frequency_mhz = Some(1000.0);
        snap.base_frequency_mhz = Some(3000.0);
        assert_eq!(snap.valid_temperature(), None);
        assert_eq!(snap.valid_frequency_ratio(), None);
    }

    #[test]
    fn test_ratio_needs_both_signals() {
        let mut snap = Snapshot::empty(1).with_frequency(1200.0, 3000.0);
        snap.valid_signals = [Signal::FreqMHz].into_iter().collect();
        assert_eq!(snap.valid_frequency_ratio(), None);
    }

    #[test]
    fn test_ratio_zero_base() {
        let snap = Snapshot::empty(1).with_frequency(1200.0, 0.0);
        assert_eq!(snap.valid_frequency_ratio(), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        let snap = Snapshot::empty(1).with_temperature(f64::NAN);
        assert_eq!(snap.valid_temperature(), None);
    }

    #[test]
    fn test_load_clamped() {
        let snap = Snapshot::empty(1).with_load(140.0);
        assert_eq!(snap.valid_load(), Some(100.0));
    }

    #[test]
    fn test_summary_marks_missing() {
        let snap = Snapshot::empty(1).with_temperature(54.3);
        let s = snap.summary();
        assert!(s.contains("54.3°C"));
        assert!(s.contains("Clock n/a"));
        assert!(s.contains("Load n/a"));
    }

    #[test]
    fn test_serde_signal_names() {
        let snap = Snapshot::empty(7).with_temperature(60.0);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"valid_signals\":[\"TempC\"]"));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
