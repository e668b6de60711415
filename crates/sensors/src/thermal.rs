// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! CPU temperature via `/sys/class/thermal/`.
//!
//! Each `thermal_zoneN` directory exposes a `type` (e.g. `x86_pkg_temp`,
//! `cpu-thermal`) and a `temp` file in millidegrees Celsius. The zone whose
//! type names the CPU package is preferred; `thermal_zone0` is the fallback,
//! which is the SoC sensor on most ARM boards.

use crate::MonitorError;
use std::path::{Path, PathBuf};

/// Default sysfs root for thermal zones.
const THERMAL_ROOT: &str = "/sys/class/thermal";

/// Zone types that report the CPU package temperature, in preference order.
const CPU_ZONE_TYPES: &[&str] = &[
    "x86_pkg_temp",
    "cpu-thermal",
    "cpu_thermal",
    "soc_thermal",
    "k10temp",
    "coretemp",
];

/// A CPU temperature reading.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ThermalInfo {
    /// CPU temperature in degrees Celsius.
    pub cpu_temp_celsius: f64,
    /// The `temp` file the reading came from.
    pub source: PathBuf,
}

impl ThermalInfo {
    /// Reads the CPU temperature from the best matching thermal zone.
    pub fn read() -> Result<Self, MonitorError> {
        let zone = find_cpu_zone(Path::new(THERMAL_ROOT))?;
        Self::read_from(&zone.join("temp"))
    }

    /// Reads a millidegree `temp` file (e.g. `54321` → 54.321 °C).
    pub(crate) fn read_from(path: &Path) -> Result<Self, MonitorError> {
        let content = read_sysfs_file(path)?;
        let millidegrees: i64 = content.parse::<i64>().map_err(|_| MonitorError::ParseError {
            path: path.display().to_string(),
            detail: format!("expected integer millidegrees, got '{content}'"),
        })?;

        Ok(Self {
            cpu_temp_celsius: millidegrees as f64 / 1000.0,
            source: path.to_path_buf(),
        })
    }
}

/// Picks the thermal zone directory under `root` that reports the CPU.
///
/// Returns the first zone whose `type` matches [`CPU_ZONE_TYPES`] (earlier
/// entries win), otherwise `thermal_zone0` if it exists.
pub(crate) fn find_cpu_zone(root: &Path) -> Result<PathBuf, MonitorError> {
    let entries = std::fs::read_dir(root).map_err(|_| MonitorError::NotAvailable {
        path: root.display().to_string(),
    })?;

    let mut zones: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with("thermal_zone"))
                .unwrap_or(false)
        })
        .collect();
    zones.sort();

    let mut best: Option<(usize, PathBuf)> = None;
    for zone in &zones {
        let Ok(kind) = read_sysfs_file(&zone.join("type")) else {
            continue;
        };
        if let Some(rank) = CPU_ZONE_TYPES.iter().position(|t| *t == kind) {
            if best.as_ref().map_or(true, |(r, _)| rank < *r) {
                best = Some((rank, zone.clone()));
            }
        }
    }

    if let Some((_, zone)) = best {
        return Ok(zone);
    }

    let zone0 = root.join("thermal_zone0");
    if zone0.join("temp").exists() {
        return Ok(zone0);
    }
    Err(MonitorError::NotAvailable {
        path: zone0.join("temp").display().to_string(),
    })
}

/// Reads a sysfs/procfs file and returns its trimmed content.
///
/// This is a shared helper used by multiple modules in this crate.
pub(crate) fn read_sysfs_file(path: &Path) -> Result<String, MonitorError> {
    if !path.exists() {
        return Err(MonitorError::NotAvailable {
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| MonitorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a fake thermal root with the given `(type, millidegrees)` zones.
    fn fake_root(name: &str, zones: &[(&str, &str)]) -> PathBuf {
        let root = std::env::temp_dir().join("thermal_watch_test").join(name);
        let _ = std::fs::remove_dir_all(&root);
        for (i, (kind, temp)) in zones.iter().enumerate() {
            let zone = root.join(format!("thermal_zone{i}"));
            std::fs::create_dir_all(&zone).unwrap();
            std::fs::write(zone.join("type"), format!("{kind}\n")).unwrap();
            std::fs::write(zone.join("temp"), format!("{temp}\n")).unwrap();
        }
        root
    }

    #[test]
    fn test_parse_millidegrees() {
        let root = fake_root("parse", &[("acpitz", "54321")]);
        let info = ThermalInfo::read_from(&root.join("thermal_zone0/temp")).unwrap();
        assert!((info.cpu_temp_celsius - 54.321).abs() < 0.001);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_prefers_cpu_zone() {
        let root = fake_root(
            "prefer",
            &[("acpitz", "40000"), ("iwlwifi_1", "35000"), ("x86_pkg_temp", "71000")],
        );
        let zone = find_cpu_zone(&root).unwrap();
        assert!(zone.ends_with("thermal_zone2"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_preference_order() {
        let root = fake_root("order", &[("coretemp", "50000"), ("cpu-thermal", "60000")]);
        let zone = find_cpu_zone(&root).unwrap();
        assert!(zone.ends_with("thermal_zone1"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_falls_back_to_zone0() {
        let root = fake_root("fallback", &[("acpitz", "45000"), ("pch_cannonlake", "48000")]);
        let zone = find_cpu_zone(&root).unwrap();
        assert!(zone.ends_with("thermal_zone0"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_root() {
        let result = find_cpu_zone(Path::new("/nonexistent/thermal"));
        assert!(matches!(result, Err(MonitorError::NotAvailable { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = ThermalInfo::read_from(Path::new("/nonexistent/thermal/temp"));
        assert!(matches!(result, Err(MonitorError::NotAvailable { .. })));
    }

    #[test]
    fn test_invalid_content() {
        let root = fake_root("invalid", &[("x86_pkg_temp", "not_a_number")]);
        let result = ThermalInfo::read_from(&root.join("thermal_zone0/temp"));
        assert!(matches!(result, Err(MonitorError::ParseError { .. })));
        let _ = std::fs::remove_dir_all(&root);
    }
}
