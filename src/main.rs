use anyhow::{Context, Result};
use clap::Parser;
use log::{error, warn};
use mm::shell::spawn_stdin_commands;
use mm::{MmPaths, Overlay, TerminalShell};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// mm - A small system metrics overlay for Linux
#[derive(Parser, Debug, Clone)]
#[command(name = "mm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Home directory holding config.json and indicators/ (overrides $MM_HOME)
    #[arg(long = "home", value_name = "DIR")]
    home: Option<PathBuf>,

    /// Run a single collect/update pass, print the row and exit
    #[arg(long = "once")]
    once: bool,
}

fn main() {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    warn!("Starting mm v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = MmPaths::resolve(cli.home.as_deref())?;
    let stdout = std::io::stdout();
    let live = !cli.once && stdout.is_terminal();
    let mut overlay = Overlay::start(&paths, TerminalShell::new(stdout, live))?;

    if cli.once {
        overlay.tick();
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the tokio runtime")?;

    let result = runtime.block_on(async {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_stdin_commands(tx);
        overlay.run(rx).await
    });
    // A pending stdin read would otherwise block shutdown
    runtime.shutdown_background();
    result?;

    if live {
        println!();
    }
    Ok(())
}
