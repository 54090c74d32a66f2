//! The timer core. [TimerSession] owns a [Stopwatch](stopwatch::Stopwatch), a
//! [TaskLedger](ledger::TaskLedger) and a [TaskRegistry](registry::TaskRegistry) and exposes them
//! through a small command interface:
//!   - `start`/`pause` toggle the stopwatch and spawn or cancel the background ticker.
//!   - `reset` folds elapsed time into the ledger under the currently selected task.
//!   - state changes are published as [SessionEvent]s to every subscriber.

pub mod events;
pub mod ledger;
pub mod registry;
pub mod stopwatch;
mod ticker;

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use anyhow::{bail, Result};
use events::SessionEvent;
use ledger::{Commit, Snapshot, TaskLedger};
use registry::TaskRegistry;
use stopwatch::{Stopwatch, DEFAULT_TICK_INTERVAL, NO_TASK_LABEL};
use ticker::Ticker;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, trace, Instrument};

use crate::utils::clock::Clock;

const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub tick_interval: Duration,
    /// How many events a subscriber may fall behind before it starts skipping.
    pub event_capacity: usize,
}

impl SessionConfig {
    pub fn from_millis(tick_ms: u64) -> Result<Self> {
        if tick_ms == 0 {
            bail!("Tick interval must be at least 1ms");
        }
        Ok(Self {
            tick_interval: Duration::from_millis(tick_ms),
            ..Self::default()
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Read-only view of the stopwatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub task: Option<String>,
    pub elapsed: Duration,
    pub running: bool,
    pub display: String,
}

impl SessionStatus {
    pub fn task_label(&self) -> &str {
        self.task.as_deref().unwrap_or(NO_TASK_LABEL)
    }
}

struct TimerState {
    stopwatch: Stopwatch,
    /// Token of the ticker serving the current running period.
    ticker: Option<CancellationToken>,
}

struct SessionInner {
    config: SessionConfig,
    timer: Mutex<TimerState>,
    ledger: TaskLedger,
    registry: Mutex<TaskRegistry>,
    events: broadcast::Sender<SessionEvent>,
    clock: Box<dyn Clock>,
}

impl SessionInner {
    fn timer(&self) -> MutexGuard<'_, TimerState> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry(&self) -> MutexGuard<'_, TaskRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies one tick on behalf of the ticker owning `token`.
    fn advance(&self, token: &CancellationToken) -> Option<SessionEvent> {
        let mut timer = self.timer();
        if token.is_cancelled() {
            return None;
        }
        let text = timer.stopwatch.tick()?;
        Some(SessionEvent::Display {
            elapsed: timer.stopwatch.elapsed(),
            text,
        })
    }

    fn publish(&self, event: SessionEvent) {
        // Sending only fails when nobody is subscribed, which is fine.
        if self.events.send(event).is_err() {
            trace!("No subscribers for session event");
        }
    }
}

/// Handle to the process-wide timer session. Cloning is cheap and every clone controls the same
/// session.
#[derive(Clone)]
pub struct TimerSession {
    inner: Arc<SessionInner>,
}

impl TimerSession {
    pub fn new(config: SessionConfig, clock: impl Clock) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            inner: Arc::new(SessionInner {
                config,
                timer: Mutex::new(TimerState {
                    stopwatch: Stopwatch::new(config.tick_interval),
                    ticker: None,
                }),
                ledger: TaskLedger::new(),
                registry: Mutex::new(TaskRegistry::new()),
                events,
                clock: Box::new(clock),
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Starts the stopwatch and spawns a ticker for it. Must be called from within a tokio
    /// runtime. Returns `false` if the stopwatch was already running.
    pub fn start(&self) -> bool {
        let token = {
            let mut timer = self.inner.timer();
            if !timer.stopwatch.start() {
                debug!("Start ignored, already running");
                return false;
            }
            let token = CancellationToken::new();
            timer.ticker = Some(token.clone());
            token
        };

        let ticker = Ticker::new(self.inner.clone(), token, self.inner.clock.instant());
        tokio::spawn(ticker.run().instrument(info_span!("ticker")));

        info!("Timer started");
        self.inner.publish(SessionEvent::StateChanged { running: true });
        true
    }

    /// Pauses the stopwatch. Once this returns no further tick is applied. Returns `false` if the
    /// stopwatch was already paused.
    pub fn pause(&self) -> bool {
        {
            let mut timer = self.inner.timer();
            if !timer.stopwatch.pause() {
                debug!("Pause ignored, not running");
                return false;
            }
            if let Some(token) = timer.ticker.take() {
                token.cancel();
            }
        }

        info!("Timer paused");
        self.inner.publish(SessionEvent::StateChanged { running: false });
        true
    }

    /// Pauses if needed, commits elapsed time to the selected task and zeroes the stopwatch.
    pub fn reset(&self) -> Option<Commit> {
        let (was_running, commit, display) = {
            let mut timer = self.inner.timer();
            let was_running = timer.stopwatch.is_running();
            if let Some(token) = timer.ticker.take() {
                token.cancel();
            }
            let commit = timer
                .stopwatch
                .reset(&self.inner.ledger, self.inner.clock.time());
            (was_running, commit, timer.stopwatch.format_elapsed())
        };

        info!("Timer reset");
        if was_running {
            self.inner.publish(SessionEvent::StateChanged { running: false });
        }
        if let Some(commit) = &commit {
            self.inner.publish(SessionEvent::LedgerChanged(commit.clone()));
        }
        self.inner.publish(SessionEvent::Display {
            elapsed: Duration::ZERO,
            text: display,
        });
        commit
    }

    /// Selects the task that will receive elapsed time on the next reset. An empty name or the
    /// [NO_TASK_LABEL] clears the selection. A running stopwatch keeps running.
    pub fn select_task(&self, name: &str) {
        let name = name.trim();
        let task = (!name.is_empty() && name != NO_TASK_LABEL).then(|| name.to_owned());
        info!("Selected task {:?}", task);
        self.inner.timer().stopwatch.select_task(task.clone());
        self.inner.publish(SessionEvent::TaskSelected(task));
    }

    /// Registers a task name for selection. Returns `false` if it was already registered.
    pub fn add_task(&self, name: &str) -> Result<bool> {
        let added = self.inner.registry().add(name)?;
        if added {
            info!("Registered task {:?}", name.trim());
        }
        Ok(added)
    }

    pub fn tasks(&self) -> Vec<String> {
        self.inner.registry().names().to_vec()
    }

    pub fn status(&self) -> SessionStatus {
        let timer = self.inner.timer();
        SessionStatus {
            task: timer.stopwatch.active_task().map(str::to_owned),
            elapsed: timer.stopwatch.elapsed(),
            running: timer.stopwatch.is_running(),
            display: timer.stopwatch.format_elapsed(),
        }
    }

    pub fn format_elapsed(&self) -> String {
        self.inner.timer().stopwatch.format_elapsed()
    }

    pub fn ledger_snapshot(&self) -> Snapshot {
        self.inner.ledger.snapshot()
    }

    pub fn ledger(&self) -> &TaskLedger {
        &self.inner.ledger
    }

    /// Stops ticking without committing anything. Used when the front end goes away.
    pub fn shutdown(&self) {
        if self.pause() {
            info!("Paused running timer on shutdown");
        }
    }
}
