//! Bounded combat log ring.

use std::collections::VecDeque;

use serde::Serialize;
use spire_siege_core::{CombatLogEntry, LogKind};

/// Ring of the most recent combat events; the oldest entry is dropped first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CombatLog {
    entries: VecDeque<CombatLogEntry>,
    capacity: usize,
    next_id: u64,
}

impl CombatLog {
    /// Creates an empty log retaining at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    /// Appends an entry, evicting the oldest one when full.
    pub fn push(&mut self, time: f64, kind: LogKind, message: String) {
        while self.entries.len() >= self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(CombatLogEntry {
            id: self.next_id,
            time,
            kind,
            message,
        });
        self.next_id += 1;
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CombatLogEntry> {
        self.entries.iter()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&CombatLogEntry> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_entries_are_dropped_first() {
        let mut log = CombatLog::with_capacity(3);
        for index in 0..5 {
            log.push(f64::from(index), LogKind::Damage, format!("hit {index}"));
        }

        let messages: Vec<_> = log.iter().map(|entry| entry.message.as_str()).collect();
        assert_eq!(messages, vec!["hit 2", "hit 3", "hit 4"]);
        assert_eq!(log.latest().map(|entry| entry.id), Some(4));
    }

    #[test]
    fn zero_capacity_still_keeps_latest_entry() {
        let mut log = CombatLog::with_capacity(0);
        log.push(0.0, LogKind::Death, "first".to_owned());
        log.push(1.0, LogKind::Death, "second".to_owned());
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().map(|entry| entry.message.as_str()), Some("second"));
    }
}
