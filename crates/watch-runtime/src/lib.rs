// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # watch-runtime
//!
//! Everything around the classifier that a running monitor needs:
//! - [`Monitor`] — the fixed-interval poll loop.
//! - [`EventSink`] / [`JsonlEventLog`] — append-only transition log.
//! - [`AlertDriver`] / [`ProcessAlert`] — the external alert process.
//! - [`DemoSource`] — synthetic snapshots for demonstrations.
//! - [`WatchConfig`] — TOML configuration.
//!
//! # Execution Model
//! One logical thread drives everything: the loop awaits a
//! `tokio::time::interval` tick or the shutdown signal, then runs one
//! synchronous [`Monitor::tick`]. The classifier never observes concurrent
//! calls.
//!
//! # Example
//! ```no_run
//! use watch_runtime::{shutdown_signal, JsonlEventLog, Monitor, ProcessAlert, WatchConfig};
//!
//! # async fn demo() -> Result<(), watch_runtime::WatchError> {
//! let config = WatchConfig::default();
//! let sink = JsonlEventLog::open(config.resolve_event_log())?;
//! let alert = ProcessAlert::new(&config.alert);
//! let mut monitor = Monitor::from_config(&config, sensors::SystemCollector::new(), sink, alert)?;
//! let stats = monitor.run(shutdown_signal()).await;
//! println!("{}", stats.summary());
//! # Ok(())
//! # }
//! ```

pub mod alert;
pub mod config;
mod demo;
mod error;
pub mod event_log;
mod monitor;
mod stats;

pub use alert::{AlertDriver, NoopAlert, ProcessAlert};
pub use config::{default_event_log_path, AlertConfig, WatchConfig};
pub use demo::{DemoSource, DEMO_PHASE_SAMPLES};
pub use error::WatchError;
pub use event_log::{Event, EventKind, EventSink, JsonlEventLog, MemoryEventSink};
pub use monitor::{shutdown_signal, Monitor, TickOutcome};
pub use stats::SessionStats;
