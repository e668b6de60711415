// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The classification engine.
//!
//! [`Classifier`] owns the snapshot history and the last reported state.
//! Each [`Classifier::classify`] call records one snapshot, evaluates the
//! throttling predicate over the hysteresis window and applies the
//! "K of the last M" rule:
//!
//! ```text
//!            hot >= K                 clear >= K
//! Normal ─────────────▶ Throttling ─────────────▶ Normal
//! ```
//!
//! Samples without a usable temperature or frequency ratio count towards
//! neither side. A window made only of such samples holds the current state.

use crate::reason::compose;
use crate::{
    ClassificationResult, ClassifierConfig, ClassifierError, HistoryBuffer, SampleVerdict,
    ThermalState, Trigger, WindowTally,
};
use sensors::Snapshot;

/// Hysteresis-based throttling classifier.
///
/// Purely computational: no I/O, no interior mutability. Calls are expected
/// strictly in timestamp order from a single owner.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    history: HistoryBuffer,
    last_state: ThermalState,
}

impl Classifier {
    /// Creates a classifier in the [`ThermalState::Normal`] state.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        Ok(Self {
            history: HistoryBuffer::new(config.history_capacity),
            config,
            last_state: ThermalState::Normal,
        })
    }

    /// Records `snapshot` and returns the resulting classification.
    pub fn classify(&mut self, snapshot: Snapshot) -> ClassificationResult {
        self.history.record(snapshot);

        let window = self.history.recent(self.config.window_max_age());
        let start = window.len().saturating_sub(self.config.window_samples);
        let window = &window[start..];

        let mut tally = WindowTally {
            size: window.len(),
            ..Default::default()
        };
        let mut triggers: Vec<Trigger> = Vec::new();
        for snap in window {
            match self.evaluate(snap) {
                SampleVerdict::Hot(fired) => {
                    tally.hot += 1;
                    // Window is oldest-first, so the last hot sample wins.
                    triggers = fired;
                }
                SampleVerdict::Clear => tally.clear += 1,
                SampleVerdict::Unknown => tally.unknown += 1,
            }
        }

        let required = self.config.required_samples;
        let previous = self.last_state;
        let state = match previous {
            _ if tally.usable() == 0 => previous,
            ThermalState::Normal if tally.hot >= required => ThermalState::Throttling,
            ThermalState::Throttling if tally.clear >= required => ThermalState::Normal,
            held => held,
        };
        let changed = state != previous;

        let reason = compose(state, changed, &tally, &triggers, required);
        if changed {
            tracing::info!("{previous} -> {state}: {reason}");
        } else {
            tracing::debug!(
                hot = tally.hot,
                clear = tally.clear,
                unknown = tally.unknown,
                "holding {state}: {reason}"
            );
        }

        self.last_state = state;
        ClassificationResult {
            state,
            reason,
            triggers,
            changed,
            window: tally,
        }
    }

    /// Evaluates the throttling predicate on one snapshot, using only its
    /// valid signals.
    pub fn evaluate(&self, snapshot: &Snapshot) -> SampleVerdict {
        let mut usable = false;
        let mut fired = Vec::new();

        if let Some(celsius) = snapshot.valid_temperature() {
            usable = true;
            if celsius > self.config.high_temp_c {
                fired.push(Trigger::Temperature {
                    celsius,
                    threshold: self.config.high_temp_c,
                });
            }
        }

        if let (Some((current_mhz, base_mhz)), Some(ratio)) = (
            snapshot.valid_frequencies(),
            snapshot.valid_frequency_ratio(),
        ) {
            usable = true;
            if ratio < self.config.freq_drop_ratio {
                fired.push(Trigger::FrequencyRatio {
                    current_mhz,
                    base_mhz,
                    ratio,
                    threshold: self.config.freq_drop_ratio,
                });
            }
        }

        match (usable, fired.is_empty()) {
            (false, _) => SampleVerdict::Unknown,
            (true, true) => SampleVerdict::Clear,
            (true, false) => SampleVerdict::Hot(fired),
        }
    }

    /// The state reported by the most recent `classify` call.
    pub fn state(&self) -> ThermalState {
        self.last_state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Forgets all history and returns to [`ThermalState::Normal`].
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_state = ThermalState::Normal;
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            config: ClassifierConfig::default(),
            history: HistoryBuffer::new(crate::config::DEFAULT_HISTORY_CAPACITY),
            last_state: ThermalState::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reason::INSUFFICIENT_DATA;
    use sensors::{Signal, SignalSet};

    const INTERVAL_MS: u64 = 2000;

    fn temp_at(i: u64, celsius: f64) -> Snapshot {
        Snapshot::empty(i * INTERVAL_MS).with_temperature(celsius)
    }

    fn feed(c: &mut Classifier, temps: &[f64]) -> Vec<ClassificationResult> {
        let base = c.history().latest().map_or(0, |s| s.timestamp_ms / INTERVAL_MS + 1);
        temps
            .iter()
            .enumerate()
            .map(|(i, t)| c.classify(temp_at(base + i as u64, *t)))
            .collect()
    }

    fn states(results: &[ClassificationResult]) -> Vec<ThermalState> {
        results.iter().map(|r| r.state).collect()
    }

    use ThermalState::{Normal, Throttling};

    #[test]
    fn test_initial_state() {
        let c = Classifier::default();
        assert_eq!(c.state(), Normal);
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ClassifierConfig {
            required_samples: 0,
            ..Default::default()
        };
        assert!(Classifier::new(config).is_err());
    }

    #[test]
    fn test_enters_after_k_hot_samples() {
        let mut c = Classifier::default();
        let results = feed(&mut c, &[92.0, 93.0, 91.0, 50.0, 51.0]);
        assert_eq!(
            states(&results),
            vec![Normal, Normal, Throttling, Throttling, Throttling]
        );
        assert!(results[2].changed);
        assert!(!results[3].changed);
        assert!(results[2].reason.contains("temperature 91.0°C above 90.0°C"));
        assert!(results[2].reason.contains("(3/3 samples)"));
    }

    #[test]
    fn test_returns_after_k_clear_samples() {
        let mut c = Classifier::default();
        feed(&mut c, &[92.0, 93.0, 91.0, 50.0, 51.0]);
        let r = feed(&mut c, &[52.0]);
        assert_eq!(r[0].state, Normal);
        assert!(r[0].changed);
        assert!(r[0].reason.starts_with("recovered: 3/5"));
    }

    #[test]
    fn test_cooling_reason_while_held() {
        let mut c = Classifier::default();
        feed(&mut c, &[95.0, 95.0, 95.0, 40.0, 40.0]);
        let r = c.classify(Snapshot::empty(5 * INTERVAL_MS));
        assert_eq!(r.state, Throttling);
        assert_eq!(r.reason, "cooling: 2/5 samples clear, need 3");
    }

    #[test]
    fn test_single_spike_suppressed() {
        let mut c = Classifier::default();
        let results = feed(&mut c, &[50.0, 51.0, 99.0, 52.0, 50.0, 51.0, 53.0]);
        assert!(results.iter().all(|r| r.state == Normal));
        assert!(results[2].reason.starts_with("transient: temperature 99.0°C"));
    }

    #[test]
    fn test_two_spikes_in_window_suppressed() {
        let mut c = Classifier::default();
        let results = feed(&mut c, &[95.0, 50.0, 95.0, 50.0, 50.0, 95.0, 50.0]);
        assert!(results.iter().all(|r| r.state == Normal));
    }

    #[test]
    fn test_frequency_ratio_only() {
        let config = ClassifierConfig {
            window_samples: 1,
            required_samples: 1,
            ..Default::default()
        };
        let mut c = Classifier::new(config).unwrap();
        let mut snap = Snapshot::empty(0).with_frequency(1200.0, 3000.0);
        snap.temperature_c = Some(20.0);
        let r = c.classify(snap);
        assert_eq!(r.state, Throttling);
        assert_eq!(r.triggers.len(), 1);
        assert!(matches!(r.triggers[0], Trigger::FrequencyRatio { .. }));
        assert!(r.reason.contains("clock 1200/3000 MHz (40%) below 60% of base"));
        assert!(!r.reason.contains("temperature"));
    }

    #[test]
    fn test_frequency_ratio_sustained() {
        let mut c = Classifier::default();
        let results: Vec<_> = (0..3)
            .map(|i| c.classify(Snapshot::empty(i * INTERVAL_MS).with_frequency(1200.0, 3000.0)))
            .collect();
        assert_eq!(states(&results), vec![Normal, Normal, Throttling]);
    }

    #[test]
    fn test_both_conditions_reported() {
        let config = ClassifierConfig {
            window_samples: 1,
            required_samples: 1,
            ..Default::default()
        };
        let mut c = Classifier::new(config).unwrap();
        let r = c.classify(
            Snapshot::empty(0)
                .with_temperature(95.0)
                .with_frequency(1000.0, 3000.0),
        );
        assert_eq!(r.triggers.len(), 2);
        assert!(r.reason.contains("temperature 95.0°C") && r.reason.contains(" and clock"));
    }

    #[test]
    fn test_placeholder_temperature_ignored() {
        let mut c = Classifier::default();
        for i in 0..10 {
            let mut snap = Snapshot::empty(i * INTERVAL_MS).with_frequency(2900.0, 3000.0);
            snap.temperature_c = Some(120.0);
            let r = c.classify(snap);
            assert_eq!(r.state, Normal);
            assert!(r.triggers.is_empty());
        }
    }

    #[test]
    fn test_blackout_holds_throttling() {
        let mut c = Classifier::default();
        feed(&mut c, &[95.0, 95.0, 95.0]);
        assert_eq!(c.state(), Throttling);

        for i in 10..20 {
            let mut snap = Snapshot::empty(i * INTERVAL_MS);
            snap.temperature_c = Some(0.0);
            snap.frequency_mhz = Some(0.0);
            let r = c.classify(snap);
            assert_eq!(r.state, Throttling);
            assert!(!r.changed);
        }
        let r = c.classify(Snapshot::empty(20 * INTERVAL_MS));
        assert!(r.reason.starts_with(INSUFFICIENT_DATA));
        assert_eq!(r.window.unknown, 5);
    }

    #[test]
    fn test_blackout_holds_normal() {
        let mut c = Classifier::default();
        for i in 0..6 {
            let r = c.classify(Snapshot::empty(i * INTERVAL_MS));
            assert_eq!(r.state, Normal);
            assert!(r.reason.starts_with(INSUFFICIENT_DATA));
        }
    }

    #[test]
    fn test_load_alone_is_not_usable() {
        let mut c = Classifier::default();
        let r = c.classify(Snapshot::empty(0).with_load(100.0));
        assert!(r.reason.starts_with(INSUFFICIENT_DATA));
    }

    #[test]
    fn test_unknown_samples_do_not_count() {
        let mut c = Classifier::default();
        feed(&mut c, &[95.0, 95.0, 95.0]);
        // Two clear, three unknown: not enough to leave Throttling.
        let mut ts = 10;
        let mut next = |snap: Snapshot| {
            ts += 1;
            Snapshot {
                timestamp_ms: ts * INTERVAL_MS,
                ..snap
            }
        };
        for snap in [
            Snapshot::empty(0).with_temperature(40.0),
            Snapshot::empty(0),
            Snapshot::empty(0).with_temperature(40.0),
            Snapshot::empty(0),
            Snapshot::empty(0),
        ] {
            assert_eq!(c.classify(next(snap)).state, Throttling);
        }
    }

    #[test]
    fn test_ratio_needs_both_signals_valid() {
        let config = ClassifierConfig {
            window_samples: 1,
            required_samples: 1,
            ..Default::default()
        };
        let mut c = Classifier::new(config).unwrap();
        let mut snap = Snapshot::empty(0).with_frequency(500.0, 3000.0);
        snap.valid_signals = SignalSet::from_iter([Signal::FreqMHz]);
        let r = c.classify(snap);
        assert_eq!(r.state, Normal);
        assert!(r.reason.starts_with(INSUFFICIENT_DATA));
    }

    #[test]
    fn test_threshold_is_strict() {
        let c = Classifier::default();
        assert_eq!(c.evaluate(&temp_at(0, 90.0)), SampleVerdict::Clear);
        let at_ratio = Snapshot::empty(0).with_frequency(1800.0, 3000.0);
        assert_eq!(c.evaluate(&at_ratio), SampleVerdict::Clear);
    }

    #[test]
    fn test_stale_samples_leave_window() {
        let mut c = Classifier::default();
        c.classify(temp_at(0, 95.0));
        c.classify(temp_at(1, 95.0));
        // A minute-long gap: the earlier hot samples are too old to count.
        let r = c.classify(Snapshot::empty(62_000).with_temperature(95.0));
        assert_eq!(r.window.size, 1);
        assert_eq!(r.state, Normal);
    }

    #[test]
    fn test_repeated_composition_is_idempotent() {
        let mut c = Classifier::default();
        feed(&mut c, &[95.0, 95.0, 95.0, 95.0, 95.0]);
        let again = feed(&mut c, &[95.0, 95.0, 95.0]);
        assert!(again.iter().all(|r| r.state == Throttling && !r.changed));
    }

    #[test]
    fn test_history_bounded() {
        let mut c = Classifier::default();
        feed(&mut c, &vec![50.0; 100]);
        assert_eq!(c.history().len(), crate::config::DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_reset() {
        let mut c = Classifier::default();
        feed(&mut c, &[95.0, 95.0, 95.0]);
        c.reset();
        assert_eq!(c.state(), Normal);
        assert!(c.history().is_empty());
    }
}
