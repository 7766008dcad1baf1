mod core;
mod decoder;
mod errors;
mod imaging;
mod shared;
mod ui;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::core::config::AppConfig;
use crate::core::messages::{MessageKey, MessageTable, SelectionPolicy};
use crate::core::pipeline::{self, RunContext};
use crate::errors::V2iError;
use crate::utils::logger::{ConsoleLogger, Level, Log};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Videos to convert, processed in the given order
    videos: Vec<PathBuf>,

    /// Settings file (defaults to v2i.config.json next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print debug output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Exit without waiting for Enter
    #[arg(long, default_value_t = false)]
    no_pause: bool,
}

/// How a run ended, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    NoInput,
    InvalidConfig,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Completed => ExitCode::SUCCESS,
            Outcome::NoInput => ExitCode::FAILURE,
            Outcome::InvalidConfig => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = utils::file_utils::executable_dir().and_then(|exe_dir| run(&cli, &exe_dir));
    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Config and message table are loaded together; either failing is an invalid configuration.
fn load_settings(cli: &Cli, exe_dir: &Path) -> Result<(AppConfig, MessageTable)> {
    let config = AppConfig::load(cli.config.as_deref(), exe_dir)?;
    let messages = config.messages(exe_dir)?;
    Ok((config, messages))
}

fn run(cli: &Cli, exe_dir: &Path) -> Result<Outcome> {
    let level = if cli.verbose { Level::Debug } else { Level::Info };

    let (config, messages) = match load_settings(cli, exe_dir) {
        Ok(loaded) => loaded,
        Err(err) => {
            let logger = ConsoleLogger::new(Level::Info, None);
            if let Ok(messages) = MessageTable::builtin(SelectionPolicy::default()) {
                logger.error(messages.message_for(MessageKey::InvalidConfig));
            }
            logger.error(&format!("{:#}", err));
            return Ok(Outcome::InvalidConfig);
        }
    };

    let log_file = config.log_file.as_ref().map(|p| config.resolve(exe_dir, p));
    utils::logger::install_panic_hook(log_file.clone());
    let logger = ConsoleLogger::new(level, log_file);

    let width = ui::banner::print(&ui::banner::BannerInfo::current());
    logger.debug(&format!("working directory: {:?}", std::env::current_dir().unwrap_or_default()));

    if cli.videos.is_empty() {
        logger.error(messages.message_for(V2iError::NoInputProvided.message_key()));
        return Ok(Outcome::NoInput);
    }

    let ctx = RunContext {
        config: &config,
        messages: &messages,
        log: &logger,
        output_base: config.output_base(exe_dir),
        show_progress: true,
    };

    let summary = pipeline::run_batch(&cli.videos, &ctx, || println!("{}", ui::banner::separator(width)));
    logger.info(&format!(
        "all videos processed ({} succeeded, {} failed)",
        summary.succeeded.len(),
        summary.failed.len()
    ));

    if config.pause_on_exit && !cli.no_pause {
        println!();
        print!("{}", messages.message_for(MessageKey::ProcessingFinished));
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
    }

    Ok(Outcome::Completed)
}
