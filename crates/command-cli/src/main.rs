//! `command-cli` binary.
//!
//! ```bash
//! cargo run -p command-cli                         # interactive, one action per line
//! cargo run -p command-cli -- --script edits.txt   # run a script
//! cargo run -p command-cli -- --config session.json -v
//! ```

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use command_cli::{Driver, run_lines, run_script};
use command_core::{EditorSession, SessionConfig};
use tracing::info;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "command-cli")]
#[command(about = "Edit a document through undoable commands")]
struct Args {
    /// Session configuration (JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read actions from a file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Pause between replay steps, overriding the configuration
    #[arg(long, value_name = "MS")]
    replay_delay_ms: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    let session = EditorSession::new(config)?;

    let mut driver = Driver::new(session);
    if let Some(ms) = args.replay_delay_ms {
        driver = driver.with_replay_delay(Duration::from_millis(ms));
    }

    let stdout = io::stdout();
    let stderr = io::stderr();
    match &args.script {
        Some(path) => {
            info!(script = %path.display(), "running script");
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            run_script(
                &mut driver,
                &path.display().to_string(),
                BufReader::new(file),
                &mut stdout.lock(),
                &mut stderr.lock(),
            )?;
        }
        None => {
            let failures = run_lines(
                &mut driver,
                io::stdin().lock(),
                &mut stdout.lock(),
                &mut stderr.lock(),
            )?;
            if failures > 0 {
                info!(failures, "finished with failed lines");
            }
        }
    }
    Ok(())
}
