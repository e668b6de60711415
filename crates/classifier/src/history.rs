// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded, time-ordered snapshot history.
//!
//! Entries are kept in arrival order. Timestamps are assumed monotonic
//! (a single poll loop feeds the buffer), so the buffer never sorts.

use sensors::Snapshot;
use std::collections::VecDeque;
use std::time::Duration;

/// FIFO buffer of the most recent `capacity` snapshots.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Creates an empty buffer. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a snapshot, evicting the oldest once capacity is exceeded.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Snapshots whose timestamp is within `duration` of the latest entry,
    /// oldest first. The latest entry is always included.
    pub fn recent(&self, duration: Duration) -> Vec<&Snapshot> {
        let Some(latest) = self.entries.back() else {
            return Vec::new();
        };
        let span = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        let cutoff = latest.timestamp_ms.saturating_sub(span);
        self.entries
            .iter()
            .filter(|s| s.timestamp_ms >= cutoff)
            .collect()
    }

    /// The newest `n` snapshots, oldest first.
    pub fn last_n(&self, n: usize) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: u64) -> Snapshot {
        Snapshot::empty(ts)
    }

    fn timestamps<'a>(it: impl IntoIterator<Item = &'a Snapshot>) -> Vec<u64> {
        it.into_iter().map(|s| s.timestamp_ms).collect()
    }

    #[test]
    fn test_evicts_oldest() {
        let mut h = HistoryBuffer::new(3);
        for ts in [1, 2, 3, 4, 5] {
            h.record(at(ts));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(timestamps(h.iter()), vec![3, 4, 5]);
        assert_eq!(h.latest().unwrap().timestamp_ms, 5);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut h = HistoryBuffer::new(0);
        h.record(at(1));
        h.record(at(2));
        assert_eq!(h.capacity(), 1);
        assert_eq!(timestamps(h.iter()), vec![2]);
    }

    #[test]
    fn test_recent_window() {
        let mut h = HistoryBuffer::new(10);
        for ts in [0, 2000, 4000, 6000, 8000] {
            h.record(at(ts));
        }
        assert_eq!(
            timestamps(h.recent(Duration::from_millis(4000))),
            vec![4000, 6000, 8000]
        );
        assert_eq!(timestamps(h.recent(Duration::ZERO)), vec![8000]);
        assert_eq!(h.recent(Duration::from_secs(3600)).len(), 5);
    }

    #[test]
    fn test_recent_empty() {
        let h = HistoryBuffer::new(4);
        assert!(h.recent(Duration::from_secs(10)).is_empty());
        assert!(h.latest().is_none());
    }

    #[test]
    fn test_last_n() {
        let mut h = HistoryBuffer::new(10);
        for ts in 1..=6 {
            h.record(at(ts));
        }
        assert_eq!(timestamps(h.last_n(3)), vec![4, 5, 6]);
        assert_eq!(timestamps(h.last_n(20)).len(), 6);
        assert_eq!(h.last_n(0).count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut h = HistoryBuffer::new(2);
        h.record(at(1));
        h.clear();
        assert!(h.is_empty());
    }
}
