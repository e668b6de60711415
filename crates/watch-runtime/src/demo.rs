// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Synthetic snapshots for `--demo`.
//!
//! Alternates [`DEMO_PHASE_SAMPLES`] normal samples with the same number of
//! hot, clock-throttled samples. The snapshots go through the real
//! classifier, so the demo also shows the hysteresis lag.

use sensors::{Snapshot, SnapshotSource};

/// Samples per demo phase (10 s at the default interval).
pub const DEMO_PHASE_SAMPLES: u64 = 5;

const DEMO_BASE_MHZ: f64 = 3000.0;

/// Alternating normal/hot snapshot generator.
#[derive(Debug, Clone)]
pub struct DemoSource {
    start_ms: u64,
    interval_ms: u64,
    tick: u64,
}

impl DemoSource {
    /// A source whose timestamps start now.
    pub fn new(interval_ms: u64) -> Self {
        Self::starting_at(sensors::now_ms(), interval_ms)
    }

    pub fn starting_at(start_ms: u64, interval_ms: u64) -> Self {
        Self {
            start_ms,
            interval_ms,
            tick: 0,
        }
    }

    /// `true` if sample `tick` belongs to a hot phase.
    pub fn is_hot_phase(tick: u64) -> bool {
        (tick / DEMO_PHASE_SAMPLES) % 2 == 1
    }
}

impl SnapshotSource for DemoSource {
    fn collect(&mut self) -> Snapshot {
        let tick = self.tick;
        self.tick += 1;

        let snap = Snapshot::empty(self.start_ms + tick * self.interval_ms);
        if Self::is_hot_phase(tick) {
            snap.with_temperature(98.5)
                .with_frequency(1200.0, DEMO_BASE_MHZ)
                .with_load(100.0)
        } else {
            snap.with_temperature(45.0)
                .with_frequency(2900.0, DEMO_BASE_MHZ)
                .with_load(15.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_alternate() {
        let mut src = DemoSource::starting_at(1_000, 2_000);
        let temps: Vec<f64> = (0..12)
            .map(|_| src.collect().valid_temperature().unwrap())
            .collect();
        assert_eq!(&temps[..5], &[45.0; 5]);
        assert_eq!(&temps[5..10], &[98.5; 5]);
        assert_eq!(&temps[10..], &[45.0; 2]);
    }

    #[test]
    fn test_timestamps_advance() {
        let mut src = DemoSource::starting_at(1_000, 2_000);
        assert_eq!(src.collect().timestamp_ms, 1_000);
        assert_eq!(src.collect().timestamp_ms, 3_000);
    }

    #[test]
    fn test_hot_phase_throttles_clock() {
        let mut src = DemoSource::starting_at(0, 2_000);
        let snaps: Vec<_> = (0..10).map(|_| src.collect()).collect();
        let ratio = snaps[7].valid_frequency_ratio().unwrap();
        assert!(ratio < 0.5);
        assert_eq!(snaps[0].valid_signals.len(), 4);
    }
}
