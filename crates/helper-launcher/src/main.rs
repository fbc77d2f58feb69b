use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use helper_core::{Launcher, print_error};
use helper_exec::{FsImageLoader, ProcessRunnerBuilder};
use helper_model::LoggingSection;
use helper_observe::{LoggerConfig, init_logger};

#[derive(Parser, Debug)]
#[command(version, about = "Runs a tracking parameter sweep described by a JSON task file")]
struct Args {
    /// Path to the JSON task file
    task_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let mut out = io::stdout();

    // 1) Task
    let launcher = Launcher::new(
        Arc::new(FsImageLoader::new()),
        Arc::new(ProcessRunnerBuilder::new()),
    );
    let config = match launcher.load(&args.task_file, &mut out) {
        Ok(config) => config,
        Err(e) => {
            print_error(&mut out, &e);
            return ExitCode::FAILURE;
        }
    };

    // 2) Logger
    if let Err(e) = init_logging(&config.logging) {
        let _ = writeln!(out, "Error. {e:#}");
        return ExitCode::FAILURE;
    }
    debug!(task_file = %args.task_file.display(), "logger initialized");

    // 3) Sweep
    match launcher.launch(&config, &mut out).await {
        Ok(outcome) if outcome.is_completed() => ExitCode::SUCCESS,
        Ok(outcome) => {
            info!(reason = outcome.cancel_reason(), "sweep did not complete");
            ExitCode::FAILURE
        }
        Err(e) => {
            print_error(&mut out, &e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(section: &LoggingSection) -> anyhow::Result<()> {
    let cfg = LoggerConfig::from_section(section).context("invalid logging section")?;
    init_logger(&cfg).context("could not start diagnostic logging")?;
    Ok(())
}
