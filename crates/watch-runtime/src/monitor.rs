// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The poll loop.
//!
//! Every tick: collect one snapshot, classify it, and when the state
//! changes, append a [`EventKind::StateChange`] event and start or stop the
//! alert. Sink and driver failures are logged and surfaced in the
//! [`TickOutcome`] but never end the loop.
//!
//! ```text
//! SnapshotSource ─▶ Classifier ─▶ (state changed?) ─▶ EventSink
//!                                                  └─▶ AlertDriver
//! ```

use crate::alert::AlertDriver;
use crate::event_log::{Event, EventKind, EventSink};
use crate::stats::SessionStats;
use crate::{WatchConfig, WatchError};
use classifier::{ClassificationResult, Classifier, ThermalState};
use sensors::{Snapshot, SnapshotSource};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// What happened during one [`Monitor::tick`].
#[derive(Debug)]
pub struct TickOutcome {
    pub snapshot: Snapshot,
    pub result: ClassificationResult,
    /// Set if the state-change event could not be logged.
    pub sink_error: Option<WatchError>,
    /// Set if the alert could not be started.
    pub alert_error: Option<WatchError>,
    /// Whether the alert is running after this tick.
    pub alert_active: bool,
    /// Whether a running alert currently owns the terminal.
    pub alert_on_screen: bool,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        self.result.changed
    }
}

/// Fixed-interval driver wiring a source, the classifier, a sink and an
/// alert together.
pub struct Monitor<S, E, A> {
    classifier: Classifier,
    source: S,
    sink: E,
    alert: A,
    interval: Duration,
    stats: SessionStats,
    last_state: ThermalState,
}

impl<S, E, A> Monitor<S, E, A>
where
    S: SnapshotSource,
    E: EventSink,
    A: AlertDriver,
{
    pub fn new(classifier: Classifier, source: S, sink: E, alert: A, interval: Duration) -> Self {
        let last_state = classifier.state();
        Self {
            classifier,
            source,
            sink,
            alert,
            interval,
            stats: SessionStats::new(),
            last_state,
        }
    }

    /// Builds a monitor from a validated [`WatchConfig`].
    pub fn from_config(
        config: &WatchConfig,
        source: S,
        sink: E,
        alert: A,
    ) -> Result<Self, WatchError> {
        config.validate()?;
        let classifier = Classifier::new(config.classifier.clone())?;
        Ok(Self::new(classifier, source, sink, alert, config.interval()))
    }

    /// Runs one poll-classify-dispatch step.
    pub fn tick(&mut self) -> TickOutcome {
        let snapshot = self.source.collect();
        let result = self.classifier.classify(snapshot.clone());
        self.stats.record(&snapshot, &result);

        let mut sink_error = None;
        let mut alert_error = None;

        if result.state != self.last_state {
            let event = Event::now(EventKind::StateChange, result.state, result.reason.clone());
            if let Err(e) = self.sink.log_event(&event) {
                tracing::warn!("failed to log state change: {e}");
                sink_error = Some(e);
            }

            match result.state {
                ThermalState::Throttling => {
                    if let Err(e) = self.alert.start() {
                        tracing::warn!("failed to start alert: {e}");
                        alert_error = Some(e);
                    }
                }
                ThermalState::Normal => self.alert.stop(),
            }

            self.last_state = result.state;
        }

        let alert_active = self.alert.is_running();
        TickOutcome {
            snapshot,
            result,
            sink_error,
            alert_error,
            alert_active,
            alert_on_screen: alert_active && self.alert.owns_terminal(),
        }
    }

    /// Polls until `shutdown` resolves, then releases the alert.
    pub async fn run<F>(&mut self, shutdown: F) -> SessionStats
    where
        F: Future<Output = ()>,
    {
        self.run_with(shutdown, |_| {}).await
    }

    /// Like [`Monitor::run`], calling `on_tick` after every tick.
    pub async fn run_with<F, T>(&mut self, shutdown: F, mut on_tick: T) -> SessionStats
    where
        F: Future<Output = ()>,
        T: FnMut(&TickOutcome),
    {
        self.log_lifecycle(EventKind::MonitorStarted, format!("interval {:?}", self.interval));
        tracing::info!("monitoring every {:?}", self.interval);

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    let outcome = self.tick();
                    on_tick(&outcome);
                }
            }
        }

        self.stop()
    }

    /// Stops the alert, logs the end of the session and returns its stats.
    pub fn stop(&mut self) -> SessionStats {
        self.alert.stop();
        let summary = self.stats.summary();
        self.log_lifecycle(EventKind::MonitorStopped, summary);
        self.stats.clone()
    }

    fn log_lifecycle(&mut self, kind: EventKind, details: String) {
        let event = Event::now(kind, self.last_state, details);
        if let Err(e) = self.sink.log_event(&event) {
            tracing::warn!("failed to log {kind:?}: {e}");
        }
    }

    pub fn state(&self) -> ThermalState {
        self.last_state
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn alert_mut(&mut self) -> &mut A {
        &mut self.alert
    }
}

/// Resolves on `SIGINT` (Ctrl+C) or, on unix, `SIGTERM`.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}
