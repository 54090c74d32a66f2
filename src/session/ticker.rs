use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::SessionInner;

/// Background task advancing the stopwatch. One ticker lives for exactly one running period:
/// it is spawned on start with a fresh token and dies once that token is cancelled.
pub(super) struct Ticker {
    session: Arc<SessionInner>,
    token: CancellationToken,
    started_at: Instant,
}

impl Ticker {
    pub(super) fn new(
        session: Arc<SessionInner>,
        token: CancellationToken,
        started_at: Instant,
    ) -> Self {
        Self {
            session,
            token,
            started_at,
        }
    }

    /// Executes the tick loop. Deadlines are computed from the start instant so slow wakeups
    /// don't accumulate drift.
    pub(super) async fn run(self) {
        let interval = self.session.config.tick_interval;
        let mut next_tick = self.started_at;
        loop {
            next_tick += interval;

            tokio::select! {
                _ = self.token.cancelled() => {
                    debug!("Ticker cancelled");
                    return;
                }
                _ = self.session.clock.sleep_until(next_tick) => ()
            }

            // The token is checked again under the stopwatch lock, a pause that won the race
            // discards this tick.
            let Some(event) = self.session.advance(&self.token) else {
                debug!("Discarding tick that arrived after pause");
                return;
            };
            trace!("Tick {:?}", event);
            self.session.publish(event);
        }
    }
}
