// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # thermal-watch
//!
//! Command-line thermal throttling monitor.
//!
//! ## Usage
//! ```bash
//! # Watch for throttling; run the alert animation while it lasts
//! thermal-watch watch
//!
//! # Same, with synthetic hot/cool cycles instead of real sensors
//! thermal-watch watch --demo
//!
//! # One-shot reading of the current sensors
//! thermal-watch status
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use watch_runtime::WatchConfig;

#[derive(Parser)]
#[command(
    name = "thermal-watch",
    about = "Detects CPU thermal throttling and tells you when things go bad",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Monitor continuously and alert while the CPU is throttling.
    Watch {
        /// Simulate thermal throttling with synthetic readings.
        #[arg(long)]
        demo: bool,

        /// Do not launch the alert process.
        #[arg(long)]
        no_alert: bool,

        /// Poll interval in milliseconds (overrides the config file).
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Event log path (overrides the config file).
        #[arg(long)]
        event_log: Option<PathBuf>,
    },

    /// Print the current sensor readings and their verdict.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => WatchConfig::from_file(path)?,
        None => WatchConfig::default(),
    };

    match cli.command {
        Commands::Watch {
            demo,
            no_alert,
            interval_ms,
            event_log,
        } => {
            if let Some(ms) = interval_ms {
                config.interval_ms = ms;
            }
            if event_log.is_some() {
                config.event_log = event_log;
            }
            commands::watch::execute(config, demo, no_alert).await
        }
        Commands::Status => commands::status::execute(config).await,
    }
}
