//! entlink - entity linking for analysed text
//!
//! Main entry point for the entlink CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, link, tokenize};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// entlink - link mentions in analysed text to knowledge-base entities
#[derive(Parser)]
#[command(name = "entlink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of discovered ones
    #[arg(long, global = true, env = "ENTLINK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link the mentions of an analysed text document
    Link(link::LinkArgs),

    /// Show how a label is tokenized for matching
    Tokenize(tokenize::TokenizeArgs),

    /// Configuration inspection
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries command output, so logs go to stderr
    let default_filter = if cli.verbose {
        "entlink=debug,entlink_linker=debug,entlink_search=debug,entlink_nlp=debug,entlink_config=debug,info"
    } else {
        "entlink=info,entlink_linker=info,entlink_search=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    let ctx = commands::Context {
        config_path: cli.config,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Link(args) => link::run(args, &ctx).await,
        Commands::Tokenize(args) => tokenize::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
