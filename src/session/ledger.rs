use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::utils::time::duration_ms;

/// Accumulated time of a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub task: String,
    #[serde(rename = "total_ms", with = "duration_ms")]
    pub total: Duration,
    pub commits: u32,
    pub last_commit: DateTime<Utc>,
}

/// Result of a successful [TaskLedger::commit].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub task: String,
    pub added: Duration,
    pub total: Duration,
    pub committed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct Accumulated {
    total: Duration,
    commits: u32,
    last_commit: DateTime<Utc>,
}

/// Mapping from task name to the total time spent on it. Totals only grow, entries are never
/// removed. The whole map sits behind one lock, which is fine at human interaction rates.
#[derive(Debug, Default)]
pub struct TaskLedger {
    entries: Mutex<HashMap<String, Accumulated>>,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Accumulated>> {
        // Every mutation is a single insert or add, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `duration` to the total of `task`. Zero durations leave the ledger untouched and
    /// return [None], so a task only shows up once time was actually spent on it.
    pub fn commit(&self, task: &str, duration: Duration, at: DateTime<Utc>) -> Option<Commit> {
        if duration.is_zero() {
            debug!("Ignoring empty commit for {task:?}");
            return None;
        }
        let mut entries = self.entries();
        let entry = entries.entry(task.to_owned()).or_insert(Accumulated {
            total: Duration::ZERO,
            commits: 0,
            last_commit: at,
        });
        entry.total += duration;
        entry.commits += 1;
        entry.last_commit = at;

        Some(Commit {
            task: task.to_owned(),
            added: duration,
            total: entry.total,
            committed_at: at,
        })
    }

    pub fn total(&self, task: &str) -> Option<Duration> {
        self.entries().get(task).map(|v| v.total)
    }

    /// Point-in-time copy of every entry. The lock is released before returning.
    pub fn snapshot(&self) -> Snapshot {
        let entries = self
            .entries()
            .iter()
            .map(|(task, v)| LedgerEntry {
                task: task.clone(),
                total: v.total,
                commits: v.commits,
                last_commit: v.last_commit,
            })
            .collect();
        Snapshot { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Copy of the ledger. Entry order is unspecified, use one of the `sorted_*` methods for display.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: Vec<LedgerEntry>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    pub fn get(&self, task: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|v| v.task == task)
    }

    /// Longest total first, ties broken by name.
    pub fn sorted_by_duration(mut self) -> Vec<LedgerEntry> {
        self.entries
            .sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.task.cmp(&b.task)));
        self.entries
    }

    pub fn sorted_by_name(mut self) -> Vec<LedgerEntry> {
        self.entries.sort_by(|a, b| a.task.cmp(&b.task));
        self.entries
    }

    pub fn into_vec(self) -> Vec<LedgerEntry> {
        self.entries
    }
}
