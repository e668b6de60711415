// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # classifier
//!
//! Decides, from a stream of sensor [`Snapshot`](sensors::Snapshot)s,
//! whether the machine is [`Normal`](ThermalState::Normal) or
//! [`Throttling`](ThermalState::Throttling).
//!
//! A sample is *hot* when its valid temperature exceeds
//! [`ClassifierConfig::high_temp_c`] or its valid `current / base` clock
//! ratio falls below [`ClassifierConfig::freq_drop_ratio`]. State only
//! changes once K of the last M samples agree, which suppresses flapping on
//! a single noisy reading.
//!
//! The crate is purely algorithmic (no I/O, no threads), so every rule is
//! unit-testable with synthetic snapshots.
//!
//! # Example
//! ```
//! use classifier::{Classifier, ThermalState};
//! use sensors::Snapshot;
//!
//! let mut engine = Classifier::default();
//! for (i, temp) in [92.0, 93.0, 91.0].into_iter().enumerate() {
//!     let snap = Snapshot::empty(i as u64 * 2000).with_temperature(temp);
//!     let result = engine.classify(snap);
//!     println!("{}: {}", result.state, result.reason);
//! }
//! assert_eq!(engine.state(), ThermalState::Throttling);
//! ```

pub mod config;
mod engine;
mod error;
mod history;
pub mod reason;
mod state;

pub use config::ClassifierConfig;
pub use engine::Classifier;
pub use error::ClassifierError;
pub use history::HistoryBuffer;
pub use state::{ClassificationResult, SampleVerdict, ThermalState, Trigger, WindowTally};
