// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for sensor reads.

/// Errors that can occur when reading a single hardware signal.
///
/// These never escape [`crate::SnapshotSource::collect`]; a failed read only
/// leaves the corresponding signal out of the snapshot's valid set.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Failed to read a sysfs or procfs file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse a numeric value from a system file.
    #[error("failed to parse value from {path}: {detail}")]
    ParseError { path: String, detail: String },

    /// The sysfs node does not exist on this machine (container, VM, non-Linux).
    #[error("sensor not available: {path}")]
    NotAvailable { path: String },
}
