// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Append-only event logging.
//!
//! Each state transition becomes one JSON object per line:
//! ```text
//! {"timestamp":"2025-06-01T12:00:04Z","kind":"state_change","state":"throttling","details":"temperature 92.0°C above 90.0°C (3/3 samples)"}
//! ```

use crate::WatchError;
use chrono::{DateTime, Utc};
use classifier::ThermalState;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// What an [`Event`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The classifier reported a new state.
    StateChange,
    /// Monitoring began.
    MonitorStarted,
    /// Monitoring ended.
    MonitorStopped,
}

/// One log record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub state: ThermalState,
    pub details: String,
}

impl Event {
    /// An event stamped with the current time.
    pub fn now(kind: EventKind, state: ThermalState, details: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            state,
            details: details.into(),
        }
    }
}

/// Durable destination for [`Event`]s.
pub trait EventSink {
    /// Appends one event. Errors are reported, never retried.
    fn log_event(&mut self, event: &Event) -> Result<(), WatchError>;
}

/// Writes events as JSON lines to a file opened in append mode.
#[derive(Debug)]
pub struct JsonlEventLog {
    path: PathBuf,
    file: File,
}

impl JsonlEventLog {
    /// Opens (creating parent directories and the file if needed) `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WatchError> {
        let path = path.as_ref().to_path_buf();
        let err = |source| WatchError::EventLog {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(err)?;

        tracing::debug!("event log opened at {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every event back from a JSONL file, skipping blank lines.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<Event>, WatchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| WatchError::EventLog {
            path: path.to_path_buf(),
            source,
        })?;
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(WatchError::from))
            .collect()
    }
}

impl EventSink for JsonlEventLog {
    fn log_event(&mut self, event: &Event) -> Result<(), WatchError> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(|source| WatchError::EventLog {
                path: self.path.clone(),
                source,
            })
    }
}

/// Keeps events in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryEventSink {
    pub events: Vec<Event>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of one kind, in order.
    pub fn of_kind(&self, kind: EventKind) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }
}

impl EventSink for MemoryEventSink {
    fn log_event(&mut self, event: &Event) -> Result<(), WatchError> {
        self.events.push(event.clone());
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn log_event(&mut self, event: &Event) -> Result<(), WatchError> {
        (**self).log_event(event)
    }
}
