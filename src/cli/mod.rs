pub mod shell;
pub mod shutdown;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, level_filters::LevelFilter};

use crate::{
    session::{SessionConfig, TimerSession},
    utils::clock::DefaultClock,
    view::{terminal::TerminalRenderer, ViewModule},
};

#[derive(Parser, Debug)]
#[command(name = "tasktimer", version, long_about = None)]
#[command(about = "Time tasks from the terminal and see how long each one took")]
pub struct Args {
    #[arg(long = "tick-ms", default_value_t = 100, help = "Timer resolution in milliseconds")]
    pub tick_ms: u64,
    #[arg(
        long = "task",
        help = "Register a task on startup. Can be repeated, e.g. --task \"Write code\" --task Review"
    )]
    pub tasks: Vec<String>,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    pub dir: Option<PathBuf>,
    #[arg(long, help = "Enable trace logging")]
    pub log: bool,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
}

impl Args {
    pub fn log_level(&self) -> Option<LevelFilter> {
        self.log.then_some(LevelFilter::TRACE)
    }
}

/// Runs the interactive front end until the user quits or presses Ctrl-C.
pub async fn run_cli(args: Args) -> Result<()> {
    let config = SessionConfig::from_millis(args.tick_ms)?;
    let session = TimerSession::new(config, DefaultClock);
    for task in &args.tasks {
        session.add_task(task)?;
    }
    info!("Starting session with {:?}", config);

    let shutdown_token = CancellationToken::new();
    let view = ViewModule::new(
        session.subscribe(),
        TerminalRenderer::new(std::io::stdout(), session.clone()),
        shutdown_token.clone(),
    );

    println!("Type `help` for a list of commands");
    let (_, view_result, shell_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        view.run(),
        async {
            let result = shell::run_shell(
                &session,
                BufReader::new(tokio::io::stdin()),
                std::io::stdout(),
                shutdown_token.clone(),
            )
            .await;
            session.shutdown();
            shutdown_token.cancel();
            result
        },
    );

    if let Err(view_result) = view_result {
        error!("View module got an error {:?}", view_result);
    }

    shell_result
}
