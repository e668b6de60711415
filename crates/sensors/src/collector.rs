// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Snapshot collection.
//!
//! [`SnapshotSource`] is the seam between hardware and classification. The
//! system implementation, [`SystemCollector`], reads each signal
//! independently; a failed read is logged and leaves that signal out of
//! [`Snapshot::valid_signals`]. No placeholder values are substituted.

use crate::cpu::{read_load_percent, CpuFrequency};
use crate::snapshot::{now_ms, Snapshot};
use crate::ThermalInfo;

/// Produces one [`Snapshot`] per poll tick.
///
/// Implementations must never fail: sensor errors are expressed as missing
/// signals, and the returned snapshot is complete when `collect` returns.
pub trait SnapshotSource {
    /// Takes a best-effort sample of all signals.
    fn collect(&mut self) -> Snapshot;
}

/// Any `FnMut() -> Snapshot` closure is a source.
impl<F> SnapshotSource for F
where
    F: FnMut() -> Snapshot,
{
    fn collect(&mut self) -> Snapshot {
        self()
    }
}

/// Reads temperature, clock and load from Linux sysfs/procfs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCollector;

impl SystemCollector {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotSource for SystemCollector {
    fn collect(&mut self) -> Snapshot {
        let mut snap = Snapshot::empty(now_ms());

        match ThermalInfo::read() {
            Ok(thermal) => snap = snap.with_temperature(thermal.cpu_temp_celsius),
            Err(e) => tracing::debug!("temperature unavailable: {e}"),
        }

        match CpuFrequency::read() {
            Ok(freq) => snap = snap.with_frequency(freq.current_mhz, freq.base_mhz),
            Err(e) => tracing::debug!("cpu frequency unavailable: {e}"),
        }

        match read_load_percent() {
            Ok(load) => snap = snap.with_load(load),
            Err(e) => tracing::debug!("cpu load unavailable: {e}"),
        }

        if snap.valid_signals.is_empty() {
            tracing::debug!("no sensor signals could be read this tick");
        }
        snap
    }
}
