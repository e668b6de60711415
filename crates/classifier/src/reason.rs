// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Human-readable reasons for classification results.
//!
//! Reasons only ever mention signals that were valid in the window.

use crate::{ThermalState, Trigger, WindowTally};

/// Prefix of every reason produced when the window has no usable signal.
pub const INSUFFICIENT_DATA: &str = "insufficient data";

/// Joins triggers as `"a and b"`.
pub(crate) fn describe_triggers(triggers: &[Trigger]) -> String {
    triggers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Builds the reason for a result.
///
/// `entered` is `true` when the state changed on this call.
pub(crate) fn compose(
    state: ThermalState,
    entered: bool,
    tally: &WindowTally,
    triggers: &[Trigger],
    required: usize,
) -> String {
    if tally.usable() == 0 {
        return format!(
            "{INSUFFICIENT_DATA}: no usable temperature or frequency readings \
             in the last {} samples, holding {state}",
            tally.size
        );
    }

    match state {
        ThermalState::Throttling if tally.hot >= required => format!(
            "{} ({}/{} samples)",
            describe_triggers(triggers),
            tally.hot,
            tally.size
        ),
        ThermalState::Throttling => format!(
            "cooling: {}/{} samples clear, need {required}",
            tally.clear, tally.size
        ),
        ThermalState::Normal if entered => format!(
            "recovered: {}/{} samples clear",
            tally.clear, tally.size
        ),
        ThermalState::Normal if tally.hot > 0 => format!(
            "transient: {} in {}/{} samples, need {required}",
            describe_triggers(triggers),
            tally.hot,
            tally.size
        ),
        ThermalState::Normal => format!(
            "within limits ({}/{} samples clear)",
            tally.clear, tally.size
        ),
    }
}
