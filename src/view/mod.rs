use anyhow::Result;
use renderer::EventRenderer;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::session::events::SessionEvent;

pub mod renderer;
pub mod stats;
pub mod terminal;

/// Bridges a session subscription and an [EventRenderer]. Runs until the session goes away or
/// shutdown is requested.
pub struct ViewModule<R> {
    events: broadcast::Receiver<SessionEvent>,
    renderer: R,
    shutdown: CancellationToken,
}

impl<R: EventRenderer> ViewModule<R> {
    pub fn new(
        events: broadcast::Receiver<SessionEvent>,
        renderer: R,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            events,
            renderer,
            shutdown,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            let event = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                event = self.events.recv() => event,
            };
            match event {
                Ok(event) => {
                    debug!("Rendering event {:?}", event);
                    if let Err(e) = self.renderer.render(&event) {
                        error!("Error rendering event {:?}: {e:?}", event)
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("View fell behind, skipped {skipped} events")
                }
                Err(RecvError::Closed) => break,
            }
        }

        self.renderer.finalize()
    }
}
