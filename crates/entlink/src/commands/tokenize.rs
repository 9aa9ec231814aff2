//! Tokenize command - show the tokens a label is matched with.

use anyhow::Result;
use clap::Args;

use entlink_nlp::normalize::fold;

use super::Context;

/// Arguments for the tokenize command.
#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// Label or mention text
    pub label: String,

    /// Language of the label, e.g. "en"
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Run the tokenize command.
pub async fn run(args: TokenizeArgs, ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    let tokenizer = loaded.config.search.tokenizer()?;

    let tokens = tokenizer.tokenize(&args.label, args.language.as_deref());
    if ctx.verbose {
        println!("# tokenizer: {}", tokenizer.name());
    }
    for token in tokens {
        println!("{}\t{}", token, fold(&token));
    }
    Ok(())
}
