//! Console host for the wheel bot.
//!
//! Runs wheel commands against a JSON options file, either one at a time or
//! as a line-oriented session on stdin.

mod commands;
mod console;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wheel_bot::{WheelConfig, WheelHandler};
use wheel_store::{FileStore, StoreLocks};

#[derive(Parser)]
#[command(
    name = "wheel",
    about = "Wheel of fate: weighted random picks from a saved list",
    version,
    propagate_version = true
)]
struct Cli {
    /// Options file to read and write
    #[arg(
        short,
        long,
        env = "WHEEL_STORE",
        default_value = "options.json",
        global = true
    )]
    store: PathBuf,

    /// RNG seed for reproducible spins
    #[arg(long, env = "WHEEL_SEED", global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single command, e.g. `wheel run add pizza, tacos`
    Run {
        /// The command and its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Read commands from stdin, one per line, until EOF or `quit`
    Repl,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut config = WheelConfig::default();
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let store = Arc::new(FileStore::new(cli.store));
    let handler = WheelHandler::new(store, &StoreLocks::new(), config);

    let result = match cli.command {
        Commands::Run { words } => commands::run::run(&handler, &words.join(" ")).await,
        Commands::Repl => commands::repl::run(&handler).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
