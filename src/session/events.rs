use std::time::Duration;

use super::ledger::Commit;

/// Notifications published by [TimerSession](super::TimerSession) for view layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Elapsed time changed, either by a tick or by a reset.
    Display { elapsed: Duration, text: String },
    LedgerChanged(Commit),
    TaskSelected(Option<String>),
    StateChanged { running: bool },
}
