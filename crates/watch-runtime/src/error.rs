// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the watch runtime.

use std::path::PathBuf;

/// Errors raised by configuration, the event sink or the alert driver.
///
/// Sink and driver errors are reported by the poll loop but never stop it.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The classifier rejected its tuning constants.
    #[error("classifier error: {0}")]
    Classifier(#[from] classifier::ClassifierError),

    /// The event log could not be opened or written.
    #[error("event log error at '{}': {source}", path.display())]
    EventLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An event could not be encoded.
    #[error("event serialisation failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The alert process could not be spawned or signalled.
    #[error("alert command '{command}' failed: {source}")]
    Alert {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
