use anyhow::Result;

use crate::session::events::SessionEvent;

/// Represents something that displays session state. The terminal is the only implementation
/// today, but a GUI would plug in here as well.
#[cfg_attr(test, mockall::automock)]
pub trait EventRenderer {
    fn render(&mut self, event: &SessionEvent) -> Result<()>;

    fn finalize(&mut self) -> Result<()>;
}
