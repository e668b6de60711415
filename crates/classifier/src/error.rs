// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the classifier.

/// Errors that can occur when constructing a classifier.
///
/// Classification itself is total; only configuration can be rejected.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The tuning constants are inconsistent.
    #[error("invalid classifier config: {0}")]
    InvalidConfig(String),
}
