use anyhow::Result;
use clap::Parser;
use tracing::error;
use tasktimer::{
    cli::{run_cli, Args},
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
        runtime::single_thread_runtime,
    },
};

fn main() -> Result<()> {
    let args = Args::parse();
    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, Ok)?;
    enable_logging(CLI_PREFIX, &app_dir, args.log_level(), args.log_console)?;

    let runtime = single_thread_runtime()?;
    let result = runtime.block_on(run_cli(args)).inspect_err(|e| {
        error!("Error running cli {e:?}");
    });
    // Stdin is read on a blocking thread that won't finish until the next line arrives.
    runtime.shutdown_background();
    result
}
