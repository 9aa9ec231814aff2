//! Config command - configuration inspection.

use anyhow::Result;
use clap::{Args, Subcommand};
use entlink_config::LayerStatus;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the merged configuration as TOML
    Show,

    /// Show which config files were checked and which were loaded
    Which,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Which => cmd_which(ctx),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;

    // Fail on values that would be rejected by `link` as well
    loaded.config.text_processing.to_text_processing_config()?;
    loaded.config.linker.to_linker_config()?;
    loaded.config.search.tokenizer()?;

    print!("{}", loaded.config.to_toml()?);
    Ok(())
}

fn cmd_which(ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    for layer in &loaded.layers {
        match &layer.status {
            LayerStatus::Loaded => println!("  loaded  {}", layer.path.display()),
            LayerStatus::Missing => println!(" missing  {}", layer.path.display()),
            LayerStatus::Skipped(reason) => {
                println!(" skipped  {}: {reason}", layer.path.display())
            }
        }
    }
    Ok(())
}
