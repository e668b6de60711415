// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `thermal-watch watch` command: monitor until interrupted.
//!
//! Transitions are printed only while the alert is not running, since the
//! alert process shares the terminal.

use anyhow::Context;
use sensors::{SnapshotSource, SystemCollector};
use watch_runtime::{
    shutdown_signal, AlertDriver, DemoSource, JsonlEventLog, Monitor, NoopAlert, ProcessAlert,
    TickOutcome, WatchConfig,
};

const BANNER: &str = "Monitoring thermal state... (Press Ctrl+C to stop)";

pub async fn execute(config: WatchConfig, demo: bool, no_alert: bool) -> anyhow::Result<()> {
    config.validate()?;

    println!("{BANNER}");
    if demo {
        println!("DEMO MODE ACTIVE: Simulating thermal throttling");
    }

    let log_path = config.resolve_event_log();
    tracing::info!("event log at {}", log_path.display());
    let sink = JsonlEventLog::open(&log_path)
        .with_context(|| format!("cannot initialise event log at {}", log_path.display()))?;

    let alert: Box<dyn AlertDriver> = if no_alert {
        Box::new(NoopAlert::new())
    } else {
        Box::new(ProcessAlert::new(&config.alert).with_banner(BANNER))
    };

    if demo {
        let source = DemoSource::new(config.interval_ms);
        monitor(&config, source, sink, alert).await?;
    } else {
        monitor(&config, SystemCollector::new(), sink, alert).await?;
    }

    println!("Events logged to {}", log_path.display());
    Ok(())
}

async fn monitor<S: SnapshotSource>(
    config: &WatchConfig,
    source: S,
    sink: JsonlEventLog,
    alert: Box<dyn AlertDriver>,
) -> anyhow::Result<()> {
    let mut monitor = Monitor::from_config(config, source, sink, alert)?;
    let stats = monitor.run_with(shutdown_signal(), report).await;

    println!();
    println!("Stopping monitor.");
    println!("{}", stats.summary());
    Ok(())
}

/// Prints state changes and driver failures.
fn report(outcome: &TickOutcome) {
    if let Some(e) = &outcome.alert_error {
        eprintln!("Error starting alert: {e}");
    }
    let time = chrono::Local::now().format("%H:%M").to_string();
    if let Some(line) = transition_line(outcome, &time) {
        println!("{line}");
    }
}

/// The line announcing a state change, unless the alert owns the screen.
fn transition_line(outcome: &TickOutcome, time: &str) -> Option<String> {
    if !outcome.changed() || outcome.alert_on_screen {
        return None;
    }
    Some(format!(
        "[{time}] {} detected ({})",
        outcome.result.state, outcome.result.reason
    ))
}
