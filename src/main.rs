//! stepgraph - template rendering on a finite-state-machine engine
//!
//! Provides both a REPL and one-shot command execution.

mod commands;
mod config;
mod repl;

use clap::{Parser, Subcommand};
use colored::Colorize;
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stepgraph")]
#[command(about = "Render string templates with the stepgraph state machine engine")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, env = "STEPGRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive REPL
    Repl,

    /// Render a template
    Render {
        /// Template text, e.g. "Hello {0}"
        template: String,

        /// Arguments substituted for {0}, {1}, ...
        args: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the template state machine as JSON
    Describe,

    /// Print the effective configuration as YAML
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Repl) | None => {
            repl::run(&config)?;
        }
        Some(cmd) => match commands::execute(&config, cmd) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("{}: {}", "Error".red(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
