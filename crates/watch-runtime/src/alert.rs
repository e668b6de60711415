// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Alert driver: an external process that runs while throttling.
//!
//! [`ProcessAlert`] owns at most one child. Stopping sends `SIGINT`, waits
//! up to the grace period for the child to exit, then kills it. A child
//! that already exited on its own is reaped and the screen restored.
//!
//! `stop` is synchronous and blocks its thread for up to the grace period
//! (200 ms by default). The poll loop calls it from inside a tick.

use crate::config::AlertConfig;
use crate::WatchError;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// How often `stop` polls the child during the grace period.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Capability to start and stop the user-facing alert.
pub trait AlertDriver {
    /// Starts the alert. A no-op if it is already running.
    fn start(&mut self) -> Result<(), WatchError>;

    /// Stops the alert if it is running. May block while the alert exits.
    fn stop(&mut self);

    /// Returns `true` while the alert is active.
    fn is_running(&mut self) -> bool;

    /// Whether a running alert takes over the terminal.
    fn owns_terminal(&self) -> bool {
        false
    }
}

/// Runs an external command (by default `gh-yule-log`) as the alert.
#[derive(Debug)]
pub struct ProcessAlert {
    command: String,
    args: Vec<String>,
    grace_period: Duration,
    clear_screen_on_stop: bool,
    banner: Option<String>,
    child: Option<Child>,
    /// Set while the screen may still show alert output.
    screen_dirty: bool,
}

impl ProcessAlert {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            grace_period: config.grace_period(),
            clear_screen_on_stop: config.clear_screen_on_stop,
            banner: None,
            child: None,
            screen_dirty: false,
        }
    }

    /// Text printed after the screen is cleared on stop.
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    /// OS process id of the running child.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn restore_terminal(&mut self) {
        if !std::mem::take(&mut self.screen_dirty) || !self.clear_screen_on_stop {
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\x1b[2J\x1b[H");
        if let Some(banner) = &self.banner {
            let _ = writeln!(out, "{banner}");
        }
        let _ = out.flush();
    }
}

impl AlertDriver for ProcessAlert {
    fn start(&mut self) -> Result<(), WatchError> {
        if self.is_running() {
            return Ok(());
        }

        let child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| WatchError::Alert {
                command: self.command.clone(),
                source,
            })?;

        tracing::info!("alert '{}' started (pid {})", self.command, child.id());
        self.child = Some(child);
        self.screen_dirty = true;
        Ok(())
    }

    /// Blocks for up to the grace period if the child ignores `SIGINT`.
    fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Ok(Some(status)) = child.try_wait() {
            tracing::debug!("alert '{}' had already exited: {status}", self.command);
            self.restore_terminal();
            return;
        }

        interrupt(&child);
        let deadline = Instant::now() + self.grace_period;
        let exited = loop {
            match child.try_wait() {
                Ok(Some(_)) => break true,
                Ok(None) if Instant::now() < deadline => std::thread::sleep(EXIT_POLL_INTERVAL),
                Ok(None) | Err(_) => break false,
            }
        };

        if !exited {
            tracing::debug!(
                "alert '{}' ignored SIGINT for {:?}, killing",
                self.command,
                self.grace_period
            );
            if let Err(e) = child.kill() {
                tracing::debug!("kill failed (process likely gone): {e}");
            }
            let _ = child.wait();
        }

        tracing::info!("alert '{}' stopped", self.command);
        self.restore_terminal();
    }

    fn is_running(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                tracing::debug!("alert '{}' exited on its own: {status}", self.command);
                self.child = None;
                self.restore_terminal();
                false
            }
            Err(e) => {
                tracing::warn!("cannot query alert '{}': {e}", self.command);
                self.child = None;
                false
            }
        }
    }

    fn owns_terminal(&self) -> bool {
        true
    }
}

impl Drop for ProcessAlert {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn interrupt(child: &Child) {
    let Ok(pid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: `kill` has no memory-safety preconditions; `pid` is our own
    // unreaped child, so the id cannot have been recycled.
    let rc = unsafe { libc::kill(pid, libc::SIGINT) };
    if rc != 0 {
        tracing::debug!("SIGINT to pid {pid} failed: {}", std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn interrupt(_child: &Child) {}

/// An alert that only counts calls.
#[derive(Debug, Default, Clone)]
pub struct NoopAlert {
    running: bool,
    /// Effective starts (calls while stopped).
    pub starts: usize,
    /// Effective stops (calls while running).
    pub stops: usize,
}

impl NoopAlert {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertDriver for NoopAlert {
    fn start(&mut self) -> Result<(), WatchError> {
        if !self.running {
            self.running = true;
            self.starts += 1;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }

    fn is_running(&mut self) -> bool {
        self.running
    }
}

impl<A: AlertDriver + ?Sized> AlertDriver for Box<A> {
    fn start(&mut self) -> Result<(), WatchError> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_running(&mut self) -> bool {
        (**self).is_running()
    }

    fn owns_terminal(&self) -> bool {
        (**self).owns_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(command: &str, args: &[&str]) -> AlertConfig {
        AlertConfig {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            grace_period_ms: 200,
            clear_screen_on_stop: false,
        }
    }

    #[test]
    fn test_noop_counts_effective_calls() {
        let mut a = NoopAlert::new();
        a.start().unwrap();
        a.start().unwrap();
        assert!(a.is_running());
        a.stop();
        a.stop();
        assert!(!a.is_running());
        assert_eq!((a.starts, a.stops), (1, 1));
    }

    #[test]
    fn test_missing_command() {
        let mut a = ProcessAlert::new(&config("/nonexistent/alert-binary", &[]));
        let err = a.start().unwrap_err();
        assert!(matches!(err, WatchError::Alert { .. }));
        assert!(!a.is_running());
        a.stop();
    }

    #[cfg(unix)]
    #[test]
    fn test_start_is_idempotent_and_stop_terminates() {
        let mut a = ProcessAlert::new(&config("sleep", &["30"]));
        a.start().unwrap();
        let pid = a.pid().unwrap();
        a.start().unwrap();
        assert_eq!(a.pid(), Some(pid));
        assert!(a.is_running());

        let begin = Instant::now();
        a.stop();
        assert!(!a.is_running());
        assert!(a.pid().is_none());
        assert!(begin.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_stop_kills_after_grace_period() {
        // The shell ignores SIGINT, so only the forced kill ends it.
        let mut a = ProcessAlert::new(&config("sh", &["-c", "trap '' INT; sleep 30"]));
        a.start().unwrap();
        std::thread::sleep(Duration::from_millis(100));
        let begin = Instant::now();
        a.stop();
        let blocked = begin.elapsed();
        assert!(blocked >= Duration::from_millis(200));
        assert!(blocked < Duration::from_secs(2));
        assert!(!a.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_self_exit_restores_screen() {
        let mut a = ProcessAlert::new(&config("true", &[]));
        a.start().unwrap();
        assert!(a.screen_dirty);
        std::thread::sleep(Duration::from_millis(200));
        assert!(!a.is_running());
        assert!(!a.screen_dirty);
    }

    #[test]
    fn test_only_process_alert_owns_terminal() {
        assert!(ProcessAlert::new(&config("true", &[])).owns_terminal());
        assert!(!NoopAlert::new().owns_terminal());
        let boxed: Box<dyn AlertDriver> = Box::new(NoopAlert::new());
        assert!(!boxed.owns_terminal());
    }

    #[cfg(unix)]
    #[test]
    fn test_exited_child_is_reaped_and_restartable() {
        let mut a = ProcessAlert::new(&config("true", &[]));
        a.start().unwrap();
        std::thread::sleep(Duration::from_millis(200));
        assert!(!a.is_running());
        // Stopping an already-exited alert is harmless.
        a.stop();
        a.start().unwrap();
        a.stop();
    }
}
