// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # sensors
//!
//! Best-effort sampling of the hardware signals used for throttling
//! detection, read from Linux `/sys/` and `/proc/`.
//!
//! # Signals
//! - **CPU temperature** — CPU thermal zone, millidegrees → °C.
//! - **CPU frequency** — current clock vs. rated base clock.
//! - **CPU load** — 1-minute load average per online core.
//!
//! # Graceful Degradation
//! Every signal is read independently. When a sysfs node is missing
//! (containers, VMs, non-Linux hosts) the signal is simply absent from
//! [`Snapshot::valid_signals`]; [`collect()`] never fails.
//!
//! # Example
//! ```no_run
//! let snap = sensors::collect();
//! println!("{}", snap.summary());
//! if let Some(ratio) = snap.valid_frequency_ratio() {
//!     println!("running at {:.0}% of base clock", ratio * 100.0);
//! }
//! ```

mod collector;
pub(crate) mod cpu;
mod error;
mod snapshot;
pub(crate) mod thermal;

pub use collector::{SnapshotSource, SystemCollector};
pub use cpu::{read_load_percent, CpuFrequency};
pub use error::MonitorError;
pub use snapshot::{now_ms, Signal, SignalSet, Snapshot};
pub use thermal::ThermalInfo;

/// Takes one best-effort snapshot of this machine.
///
/// This is a convenience wrapper around [`SystemCollector`].
pub fn collect() -> Snapshot {
    SystemCollector::new().collect()
}
