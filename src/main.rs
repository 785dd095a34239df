//! Robobrain console: reads commands from stdin, writes actuator lines to
//! stdout. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use robobrain::brain::MechCommand;
use robobrain::config::BrainConfig;
use robobrain::console::{Console, SessionEnd};

/// Interpret robot commands one line at a time
#[derive(Parser)]
#[command(name = "robobrain", version)]
#[command(about = "Interpret robot movement and trade commands one line at a time")]
struct Args {
    /// Config file (default: ~/.robobrain/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum nesting depth for variable evaluation (1-512)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=512))]
    max_depth: Option<u64>,

    /// Do not print a prompt (for piping into an actuator)
    #[arg(long)]
    no_prompt: bool,

    /// Log filter, e.g. "debug" or "robobrain=trace"
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => BrainConfig::load_from(path)?,
        None => BrainConfig::load()?,
    };
    if let Some(depth) = args.max_depth {
        config.max_eval_depth = usize::try_from(depth).context("--max-depth out of range")?;
    }
    if args.no_prompt {
        config.show_prompt = false;
    }

    // Leave the actuator halted if the session is interrupted.
    ctrlc::set_handler(|| {
        let mut out = io::stdout();
        let _ = writeln!(out, "{}", MechCommand::Stop);
        let _ = out.flush();
        std::process::exit(130);
    })
    .context("failed to install interrupt handler")?;

    info!(
        "robobrain v{} (max eval depth {})",
        env!("CARGO_PKG_VERSION"),
        config.max_eval_depth
    );

    let mut console = Console::new(config);
    let end = console
        .run(io::stdin().lock(), &mut io::stdout())
        .context("console i/o failed")?;

    match end {
        SessionEnd::Quit => info!("session ended by quit"),
        SessionEnd::EndOfInput => info!("session ended at end of input"),
    }
    Ok(())
}
