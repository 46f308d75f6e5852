//! In-game event log.
//!
//! The log is game data shown to players (separate from `tracing`
//! diagnostics). Entries are append-only; once the log exceeds its
//! capacity the oldest entries are dropped, so ordering is never violated.
//!
//! Timestamps are logical: a monotonically increasing counter that keeps
//! counting across trims. The core has no clock dependency.

use std::collections::BTreeMap;

use im::Vector;
use serde::{Deserialize, Serialize};

/// Log entry category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogCategory {
    Game,
    Combat,
    Card,
    Phase,
}

/// A single log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: u64,
    pub message: String,
    pub category: LogCategory,
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Bounded, append-only event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vector<LogEntry>,
    capacity: usize,
    next_timestamp: u64,
}

impl GameLog {
    /// Create an empty log with the given retention cap.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vector::new(),
            capacity: capacity.max(1),
            next_timestamp: 0,
        }
    }

    /// Append an entry, trimming the oldest beyond capacity.
    ///
    /// Returns the assigned timestamp.
    pub fn append(
        &mut self,
        message: impl Into<String>,
        category: LogCategory,
        metadata: Option<BTreeMap<String, String>>,
    ) -> u64 {
        let timestamp = self.next_timestamp;
        self.next_timestamp += 1;

        self.entries.push_back(LogEntry {
            timestamp,
            message: message.into(),
            category,
            metadata,
        });

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        timestamp
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries of one category, oldest first.
    pub fn by_category(&self, category: LogCategory) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Whether timestamps are strictly increasing.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.entries
            .iter()
            .zip(self.entries.iter().skip(1))
            .all(|(a, b)| a.timestamp < b.timestamp)
    }
}

/// Build a metadata map from key/value pairs.
#[must_use]
pub fn metadata<const N: usize>(pairs: [(&str, String); N]) -> Option<BTreeMap<String, String>> {
    Some(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_increasing_timestamps() {
        let mut log = GameLog::new(10);

        let t0 = log.append("one", LogCategory::Game, None);
        let t1 = log.append("two", LogCategory::Card, None);

        assert!(t0 < t1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().map(|e| e.message.as_str()), Some("two"));
    }

    #[test]
    fn test_retention_drops_oldest() {
        let mut log = GameLog::new(3);

        for i in 0..5 {
            log.append(format!("entry {}", i), LogCategory::Phase, None);
        }

        let messages: Vec<_> = log.iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages, vec!["entry 2", "entry 3", "entry 4"]);
        assert!(log.is_ordered());
        assert_eq!(log.iter().next().map(|e| e.timestamp), Some(2));
    }

    #[test]
    fn test_by_category_and_metadata() {
        let mut log = GameLog::new(10);
        log.append("hit", LogCategory::Combat, metadata([("damage", "3".to_string())]));
        log.append("draw", LogCategory::Card, None);

        let combat: Vec<_> = log.by_category(LogCategory::Combat).collect();
        assert_eq!(combat.len(), 1);
        assert_eq!(
            combat[0].metadata.as_ref().and_then(|m| m.get("damage")).map(String::as_str),
            Some("3")
        );
    }

    #[test]
    fn test_log_serde_roundtrip() {
        let mut log = GameLog::new(4);
        log.append("hello", LogCategory::Game, None);

        let json = serde_json::to_string(&log).unwrap();
        let restored: GameLog = serde_json::from_str(&json).unwrap();

        assert_eq!(log, restored);
    }
}
