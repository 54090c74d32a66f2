use std::io::Write;

use ansi_term::{Colour, Style};
use anyhow::Result;

use crate::session::{events::SessionEvent, stopwatch::NO_TASK_LABEL, TimerSession};

use super::{renderer::EventRenderer, stats::stats_lines};

/// Renders session events as plain terminal output. The clock line is rewritten in place, every
/// other event gets its own line.
pub struct TerminalRenderer<W: Write> {
    out: W,
    session: TimerSession,
    /// Whether the cursor currently sits at the end of a clock line.
    clock_line: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, session: TimerSession) -> Self {
        Self {
            out,
            session,
            clock_line: false,
        }
    }

    fn end_clock_line(&mut self) -> Result<()> {
        if self.clock_line {
            writeln!(self.out)?;
            self.clock_line = false;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventRenderer for TerminalRenderer<W> {
    fn render(&mut self, event: &SessionEvent) -> Result<()> {
        match event {
            SessionEvent::Display { text, .. } => {
                let status = self.session.status();
                write!(
                    self.out,
                    "\r{} {}",
                    Style::new().bold().paint(text),
                    status.task_label()
                )?;
                self.clock_line = true;
            }
            SessionEvent::LedgerChanged(_) => {
                self.end_clock_line()?;
                writeln!(self.out, "{}", Style::new().underline().paint("Daily Stats"))?;
                for line in stats_lines(self.session.ledger_snapshot()) {
                    writeln!(self.out, "  {line}")?;
                }
            }
            SessionEvent::TaskSelected(task) => {
                self.end_clock_line()?;
                writeln!(
                    self.out,
                    "Task: {}",
                    task.as_deref().unwrap_or(NO_TASK_LABEL)
                )?;
            }
            SessionEvent::StateChanged { running } => {
                self.end_clock_line()?;
                if *running {
                    writeln!(self.out, "{}", Colour::Green.paint("Started"))?;
                } else {
                    writeln!(self.out, "{}", Colour::Yellow.paint("Paused"))?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.end_clock_line()?;
        self.out.flush()?;
        Ok(())
    }
}
