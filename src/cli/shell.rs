use std::{io::Write, str::FromStr};

use anyhow::{anyhow, bail, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    session::{stopwatch::NO_TASK_LABEL, TimerSession},
    view::stats::stats_lines,
};

const HELP: &str = "\
Commands:
  start            start or resume the timer
  pause            pause the timer
  toggle           start when paused, pause when running
  reset            add elapsed time to the selected task and zero the timer
  select <task>    select a task, registering it if needed
  add <task>       register a task
  tasks            list registered tasks
  stats            show time per task
  json             show time per task as JSON
  status           show the timer
  help             show this message
  quit             exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Start,
    Pause,
    Toggle,
    Reset,
    Select(String),
    Add(String),
    Tasks,
    Stats,
    Json,
    Status,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, argument) = match s.split_once(char::is_whitespace) {
            Some((verb, argument)) => (verb, argument.trim()),
            None => (s, ""),
        };
        let needs_task = |command: fn(String) -> ShellCommand| {
            if argument.is_empty() {
                Err(anyhow!("Usage: {} <task>", verb.to_lowercase()))
            } else {
                Ok(command(argument.to_owned()))
            }
        };

        let command = match verb.to_lowercase().as_str() {
            "start" | "resume" => Self::Start,
            "pause" => Self::Pause,
            "toggle" => Self::Toggle,
            "reset" => Self::Reset,
            "select" => needs_task(Self::Select)?,
            "add" => needs_task(Self::Add)?,
            "tasks" => Self::Tasks,
            "stats" => Self::Stats,
            "json" => Self::Json,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => bail!("Unknown command {verb:?}, type `help` for a list of commands"),
        };
        if !argument.is_empty() && !matches!(command, Self::Select(_) | Self::Add(_)) {
            bail!("{verb} doesn't take arguments");
        }
        Ok(command)
    }
}

/// Executes a single command. Outcomes that the view layer doesn't already render are written to
/// `out`.
pub fn execute(session: &TimerSession, command: ShellCommand, out: &mut impl Write) -> Result<()> {
    debug!("Executing {:?}", command);
    match command {
        ShellCommand::Start => {
            if !session.start() {
                writeln!(out, "Timer is already running")?;
            }
        }
        ShellCommand::Pause => {
            if !session.pause() {
                writeln!(out, "Timer is not running")?;
            }
        }
        ShellCommand::Toggle => {
            if session.status().running {
                session.pause();
            } else {
                session.start();
            }
        }
        ShellCommand::Reset => {
            if session.reset().is_none() {
                writeln!(out, "Nothing committed")?;
            }
        }
        ShellCommand::Select(task) => {
            // Selecting the placeholder clears the selection.
            if task.trim() != NO_TASK_LABEL {
                session.add_task(&task)?;
            }
            session.select_task(&task);
        }
        ShellCommand::Add(task) => {
            if session.add_task(&task)? {
                writeln!(out, "Added {:?}", task.trim())?;
            } else {
                writeln!(out, "{:?} is already registered", task.trim())?;
            }
        }
        ShellCommand::Tasks => {
            let tasks = session.tasks();
            if tasks.is_empty() {
                writeln!(out, "No tasks registered, use `add <task>`")?;
            }
            for task in tasks {
                writeln!(out, "  {task}")?;
            }
        }
        ShellCommand::Stats => {
            for line in stats_lines(session.ledger_snapshot()) {
                writeln!(out, "{line}")?;
            }
        }
        ShellCommand::Json => {
            let snapshot = session.ledger_snapshot().sorted_by_name();
            writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
        }
        ShellCommand::Status => {
            let status = session.status();
            writeln!(
                out,
                "{} {} ({})",
                status.display,
                status.task_label(),
                if status.running { "running" } else { "paused" }
            )?;
        }
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// Reads commands line by line until `quit`, end of input or shutdown.
pub async fn run_shell(
    session: &TimerSession,
    input: impl AsyncBufRead + Unpin,
    mut out: impl Write,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!("Input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => {
                if let Err(e) = execute(session, command, &mut out) {
                    writeln!(out, "{e}")?;
                }
            }
            Err(e) => writeln!(out, "{e}")?,
        }
        out.flush()?;
    }
    info!("Shell finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use tokio_util::sync::CancellationToken;

    use crate::{
        session::{SessionConfig, TimerSession},
        utils::{clock::DefaultClock, logging::TEST_LOGGING},
    };

    use super::{execute, run_shell, ShellCommand};

    #[test]
    fn parses_commands() -> Result<()> {
        assert_eq!("start".parse::<ShellCommand>()?, ShellCommand::Start);
        assert_eq!("  PAUSE ".parse::<ShellCommand>()?, ShellCommand::Pause);
        assert_eq!(
            "select Write code".parse::<ShellCommand>()?,
            ShellCommand::Select("Write code".into())
        );
        assert_eq!(
            "add   Review  ".parse::<ShellCommand>()?,
            ShellCommand::Add("Review".into())
        );
        assert_eq!("exit".parse::<ShellCommand>()?, ShellCommand::Quit);
        Ok(())
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!("select".parse::<ShellCommand>().is_err());
        assert!("reset now".parse::<ShellCommand>().is_err());
        assert!("launch".parse::<ShellCommand>().is_err());
    }

    #[test]
    fn add_rejects_reserved_name() -> Result<()> {
        let session = TimerSession::new(SessionConfig::default(), DefaultClock);
        let mut out = Vec::new();
        assert!(execute(&session, ShellCommand::Add("Select a task".into()), &mut out).is_err());
        execute(&session, ShellCommand::Add("Review".into()), &mut out)?;
        execute(&session, ShellCommand::Add("Review".into()), &mut out)?;
        assert_eq!(session.tasks(), ["Review"]);
        assert!(String::from_utf8(out)?.contains("already registered"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_session() -> Result<()> {
        *TEST_LOGGING;
        let session = TimerSession::new(SessionConfig::default(), DefaultClock);
        let mut out = Vec::new();

        execute(&session, ShellCommand::Select("Write".into()), &mut out)?;
        execute(&session, ShellCommand::Toggle, &mut out)?;
        tokio::time::sleep(Duration::from_millis(250)).await;
        execute(&session, ShellCommand::Toggle, &mut out)?;
        assert!(!session.status().running);
        execute(&session, ShellCommand::Reset, &mut out)?;
        execute(&session, ShellCommand::Stats, &mut out)?;
        execute(&session, ShellCommand::Json, &mut out)?;

        let out = String::from_utf8(out)?;
        assert!(out.contains("Write: 00:00:00"));
        assert!(out.contains("\"total_ms\": 200"));
        assert_eq!(session.tasks(), ["Write"]);
        Ok(())
    }

    #[tokio::test]
    async fn shell_reads_until_quit() -> Result<()> {
        *TEST_LOGGING;
        let session = TimerSession::new(SessionConfig::default(), DefaultClock);
        let input: &[u8] = b"add Review\n\nbogus\nstatus\nquit\nadd Ignored\n";
        let mut out = Vec::new();

        run_shell(&session, input, &mut out, CancellationToken::new()).await?;

        let out = String::from_utf8(out)?;
        assert!(out.contains("Added \"Review\""));
        assert!(out.contains("Unknown command \"bogus\""));
        assert!(out.contains("00:00:00 Select a task (paused)"));
        assert_eq!(session.tasks(), ["Review"]);
        Ok(())
    }
}
