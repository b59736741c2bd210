use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod extract;
mod load;
mod shell;
mod state;

use load::LoadArgs;

#[derive(Parser, Debug)]
#[command(name = "teller", version, about = "Load bank statements into a reconciled CSV ledger")]
struct Cli {
    /// Config file (default: ~/.teller/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Starts the interactive shell when omitted
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a bank statement, validate its balances, append it to the CSV
    Load(LoadArgs),

    /// Interactive session (`load`, `help`, `quit`)
    Shell,

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config_path = config::resolve_config_path(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Load(args)) => {
            let cfg = config::load_config(&config_path)?;
            load::run_load(&args, &cfg)?;
        }

        None | Some(Command::Shell) => {
            let cfg = config::load_config(&config_path)?;
            shell::run_shell(&cfg)?;
        }

        Some(Command::Config { command }) => match command {
            ConfigCommand::Init => config::init_config(&config_path)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(&config_path)?;
                config::show_config(&cfg, &config_path)?;
            }
        },
    }

    Ok(())
}
