// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! CPU clock and load readings.
//!
//! Reads CPU state from:
//! - `/sys/devices/system/cpu/cpu0/cpufreq/` — current clock and the rated
//!   base clock. `base_frequency` (intel_pstate) is the true nominal clock;
//!   other drivers only expose `cpuinfo_max_freq`, which is used instead.
//! - `/sys/devices/system/cpu/online` — online core count.
//! - `/proc/loadavg` — 1-minute load average as a utilisation proxy that
//!   does not need two-sample `/proc/stat` deltas.

use crate::thermal::read_sysfs_file;
use crate::MonitorError;
use std::path::Path;

/// Base sysfs path for CPU information.
const CPU_BASE: &str = "/sys/devices/system/cpu";

/// Kernel load average file.
const LOADAVG_PATH: &str = "/proc/loadavg";

/// Files consulted for the base clock, in preference order.
const BASE_FREQ_FILES: &[&str] = &["base_frequency", "cpuinfo_max_freq", "scaling_max_freq"];

/// Current and nominal CPU clock.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CpuFrequency {
    /// Current clock of core 0 in MHz.
    pub current_mhz: f64,
    /// Rated clock in MHz.
    pub base_mhz: f64,
}

impl CpuFrequency {
    /// Reads core 0's cpufreq state.
    pub fn read() -> Result<Self, MonitorError> {
        Self::read_from(&Path::new(CPU_BASE).join("cpu0/cpufreq"))
    }

    /// Reads a `cpufreq` directory.
    pub(crate) fn read_from(cpufreq_dir: &Path) -> Result<Self, MonitorError> {
        let current_mhz = read_freq(&cpufreq_dir.join("scaling_cur_freq"))?;

        let mut last_err = None;
        for file in BASE_FREQ_FILES {
            match read_freq(&cpufreq_dir.join(file)) {
                Ok(base_mhz) if base_mhz > 0.0 => {
                    return Ok(Self {
                        current_mhz,
                        base_mhz,
                    })
                }
                Ok(_) => {}
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.unwrap_or_else(|| MonitorError::NotAvailable {
            path: cpufreq_dir.join("base_frequency").display().to_string(),
        }))
    }

    /// Returns `current / base`.
    pub fn ratio(&self) -> f64 {
        if self.base_mhz <= 0.0 {
            return 0.0;
        }
        self.current_mhz / self.base_mhz
    }
}

/// Reads a CPU frequency value from sysfs (reported in kHz, returned as MHz).
fn read_freq(path: &Path) -> Result<f64, MonitorError> {
    let content = read_sysfs_file(path)?;
    let khz: u64 = content.parse::<u64>().map_err(|_| MonitorError::ParseError {
        path: path.display().to_string(),
        detail: format!("expected integer kHz value, got '{content}'"),
    })?;
    Ok(khz as f64 / 1000.0)
}

/// Reads the 1-minute load average normalised by online cores, as a
/// percentage clamped to `[0, 100]`.
pub fn read_load_percent() -> Result<f64, MonitorError> {
    let path = Path::new(LOADAVG_PATH);
    let content = read_sysfs_file(path)?;
    let load_1m = parse_loadavg(&content).ok_or_else(|| MonitorError::ParseError {
        path: path.display().to_string(),
        detail: format!("unexpected loadavg format '{content}'"),
    })?;
    Ok(load_percent(load_1m, read_online_cores()))
}

/// Parses the first field of `/proc/loadavg` (`"0.35 0.28 0.22 1/234 5678"`).
fn parse_loadavg(content: &str) -> Option<f64> {
    content.split_whitespace().next()?.parse().ok()
}

fn load_percent(load_1m: f64, cores: u32) -> f64 {
    (load_1m / cores.max(1) as f64 * 100.0).clamp(0.0, 100.0)
}

/// Determines the number of online CPU cores.
///
/// Tries `/sys/devices/system/cpu/online` first (e.g., `"0-3"` → 4 cores),
/// then falls back to `std::thread::available_parallelism()`, then 1.
fn read_online_cores() -> u32 {
    let online_path = Path::new(CPU_BASE).join("online");
    if let Some(count) = read_sysfs_file(&online_path)
        .ok()
        .and_then(|content| parse_cpu_range(&content))
    {
        return count;
    }

    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

/// Parses a CPU range string like `"0-3"` → 4, `"0"` → 1, `"0,2-3"` → 3.
fn parse_cpu_range(s: &str) -> Option<u32> {
    let mut total = 0u32;
    for part in s.split(',') {
        let part = part.trim();
        if let Some((start_s, end_s)) = part.split_once('-') {
            let start: u32 = start_s.trim().parse().ok()?;
            let end: u32 = end_s.trim().parse().ok()?;
            total += end.checked_sub(start)? + 1;
        } else {
            let _: u32 = part.parse().ok()?;
            total += 1;
        }
    }
    (total > 0).then_some(total)
}
