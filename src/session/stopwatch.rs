use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::utils::time::format_elapsed;

use super::ledger::{Commit, TaskLedger};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Label shown when no task is selected. Never accepted as a task name.
pub const NO_TASK_LABEL: &str = "Select a task";

/// Synchronous stopwatch state. Scheduling of ticks lives in
/// [TimerSession](super::TimerSession), this type only knows the rules.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    active_task: Option<String>,
    elapsed: Duration,
    running: bool,
    interval: Duration,
}

impl Stopwatch {
    pub fn new(interval: Duration) -> Self {
        Self {
            active_task: None,
            elapsed: Duration::ZERO,
            running: false,
            interval,
        }
    }

    /// Returns `false` if the stopwatch was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Returns `false` if the stopwatch was already paused.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Advances elapsed time by exactly one interval and returns the new display text. A tick
    /// arriving while paused is dropped.
    pub fn tick(&mut self) -> Option<String> {
        if !self.running {
            debug!("Dropping tick on a paused stopwatch");
            return None;
        }
        self.elapsed += self.interval;
        Some(self.format_elapsed())
    }

    /// Pauses, folds elapsed time into `ledger` under the active task and zeroes the stopwatch.
    /// Nothing is committed when no task is selected or no time has elapsed.
    pub fn reset(&mut self, ledger: &TaskLedger, at: DateTime<Utc>) -> Option<Commit> {
        self.pause();
        let elapsed = std::mem::replace(&mut self.elapsed, Duration::ZERO);
        let task = self.active_task.as_deref()?;
        let commit = ledger.commit(task, elapsed, at)?;
        info!(
            "Committed {} to {task:?}, total {}",
            format_elapsed(commit.added),
            format_elapsed(commit.total)
        );
        Some(commit)
    }

    /// Switching tasks never touches elapsed time. Whatever task is active at reset receives it.
    pub fn select_task(&mut self, task: Option<String>) {
        self.active_task = task;
    }

    pub fn format_elapsed(&self) -> String {
        format_elapsed(self.elapsed)
    }

    pub fn active_task(&self) -> Option<&str> {
        self.active_task.as_deref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use crate::session::ledger::TaskLedger;

    use super::Stopwatch;

    fn now() -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn run_ticks(stopwatch: &mut Stopwatch, ticks: u32) {
        for _ in 0..ticks {
            stopwatch.tick();
        }
    }

    #[test]
    fn ticks_advance_by_exact_interval() {
        let mut stopwatch = Stopwatch::default();
        stopwatch.start();
        run_ticks(&mut stopwatch, 36_610);
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(100) * 36_610);
        assert_eq!(stopwatch.format_elapsed(), "01:01:01");
    }

    #[test]
    fn tick_while_paused_is_dropped() {
        let mut stopwatch = Stopwatch::default();
        assert_eq!(stopwatch.tick(), None);
        stopwatch.start();
        assert_eq!(stopwatch.tick().as_deref(), Some("00:00:00"));
        stopwatch.pause();
        assert_eq!(stopwatch.tick(), None);
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(100));
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut stopwatch = Stopwatch::default();
        assert!(stopwatch.start());
        assert!(!stopwatch.start());
        assert!(stopwatch.pause());
        assert!(!stopwatch.pause());
        assert!(!stopwatch.is_running());
    }

    #[test]
    fn reset_without_task_only_zeroes() {
        let ledger = TaskLedger::new();
        let mut stopwatch = Stopwatch::default();
        stopwatch.start();
        run_ticks(&mut stopwatch, 5);

        assert_eq!(stopwatch.reset(&ledger, now()), None);
        assert!(ledger.is_empty());
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
        assert!(!stopwatch.is_running());
    }

    #[test]
    fn reset_with_zero_elapsed_commits_nothing() {
        let ledger = TaskLedger::new();
        let mut stopwatch = Stopwatch::default();
        stopwatch.select_task(Some("Write".into()));
        assert_eq!(stopwatch.reset(&ledger, now()), None);
        assert!(ledger.is_empty());
    }

    #[test]
    fn repeated_sessions_accumulate() {
        let ledger = TaskLedger::new();
        let mut stopwatch = Stopwatch::default();
        stopwatch.select_task(Some("Write".into()));

        for expected in [200, 400] {
            stopwatch.start();
            run_ticks(&mut stopwatch, 2);
            let commit = stopwatch.reset(&ledger, now()).unwrap();
            assert_eq!(commit.added, Duration::from_millis(200));
            assert_eq!(commit.total, Duration::from_millis(expected));
        }
        assert_eq!(ledger.total("Write"), Some(Duration::from_millis(400)));
    }

    #[test]
    fn time_goes_to_task_active_at_reset() {
        let ledger = TaskLedger::new();
        let mut stopwatch = Stopwatch::default();
        stopwatch.select_task(Some("Read".into()));
        stopwatch.start();
        run_ticks(&mut stopwatch, 3);
        stopwatch.select_task(Some("Write".into()));
        run_ticks(&mut stopwatch, 2);
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(500));

        stopwatch.reset(&ledger, now());
        assert_eq!(ledger.total("Read"), None);
        assert_eq!(ledger.total("Write"), Some(Duration::from_millis(500)));
    }
}
