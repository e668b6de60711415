// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `thermal-watch status` command: one-shot sensor readout.
//!
//! Missing sensors (containers, VMs) show as `n/a`; the command still works.

use classifier::{Classifier, SampleVerdict};
use sensors::Signal;
use watch_runtime::WatchConfig;

pub async fn execute(config: WatchConfig) -> anyhow::Result<()> {
    let classifier = Classifier::new(config.classifier.clone())?;
    let thresholds = classifier.config();
    let snapshot = sensors::collect();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║          thermal-watch · Sensor Status               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    // ── Thermal ────────────────────────────────────────────────
    println!("  Thermal");
    match snapshot.valid_temperature() {
        Some(temp) => {
            println!(
                "   Temperature:  {temp:.1} C  {}",
                temp_bar(temp, thresholds.high_temp_c)
            );
            println!(
                "   Headroom:     {:.1} C to threshold ({:.0} C)",
                thresholds.high_temp_c - temp,
                thresholds.high_temp_c,
            );
        }
        None => println!("   Temperature:  n/a"),
    }
    println!();

    // ── CPU ────────────────────────────────────────────────────
    println!("  CPU");
    match (snapshot.valid_frequencies(), snapshot.valid_frequency_ratio()) {
        (Some((cur, base)), Some(ratio)) => {
            println!("   Frequency:    {cur:.0} / {base:.0} MHz");
            println!(
                "   Ratio:        {:.0}% of base (threshold {:.0}%)  {}",
                ratio * 100.0,
                thresholds.freq_drop_ratio * 100.0,
                usage_bar(ratio),
            );
        }
        _ => println!("   Frequency:    n/a"),
    }
    match snapshot.valid_load() {
        Some(load) => println!("   Load (1m):    {load:.0}%  {}", usage_bar(load / 100.0)),
        None => println!("   Load (1m):    n/a"),
    }
    println!();

    // ── Assessment ─────────────────────────────────────────────
    let valid: Vec<&str> = Signal::ALL
        .iter()
        .filter(|s| snapshot.is_valid(**s))
        .map(|s| s.name())
        .collect();
    println!("  Assessment");
    println!(
        "   Signals:      {}",
        if valid.is_empty() { "none".to_string() } else { valid.join(", ") }
    );
    match classifier.evaluate(&snapshot) {
        SampleVerdict::Hot(triggers) => {
            println!("   Sample:       THROTTLING");
            for t in triggers {
                println!("                 {t}");
            }
        }
        SampleVerdict::Clear => println!("   Sample:       within limits"),
        SampleVerdict::Unknown => println!("   Sample:       insufficient data"),
    }
    println!(
        "   Hysteresis:   {} of {} samples to change state",
        thresholds.required_samples, thresholds.window_samples,
    );
    println!();
    println!("{}", snapshot.summary());

    Ok(())
}

/// Creates a visual temperature bar (0-100 C scale).
fn temp_bar(celsius: f64, high: f64) -> String {
    let filled = ((celsius / 100.0) * 20.0).round().clamp(0.0, 20.0) as usize;
    let symbol = if celsius > high {
        "#"
    } else if celsius >= high - 20.0 {
        "="
    } else {
        "-"
    };
    format!("[{}{}]", symbol.repeat(filled), ".".repeat(20 - filled))
}

/// Creates a visual usage bar (0.0-1.0 scale).
fn usage_bar(ratio: f64) -> String {
    let filled = (ratio * 20.0).round().clamp(0.0, 20.0) as usize;
    format!("[{}{}]", "=".repeat(filled), ".".repeat(20 - filled))
}
