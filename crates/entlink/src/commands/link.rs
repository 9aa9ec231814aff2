//! Link command - run the linker over one document.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow};
use clap::Args;
use tracing::{info, warn};

use entlink_linker::{CancellationToken, EntityLinker, RedirectMode};
use entlink_nlp::AnalysedText;
use entlink_search::InMemorySearcher;

use super::Context;

/// Arguments for the link command.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Analysed text document (JSON)
    #[arg(short, long)]
    pub document: PathBuf,

    /// Knowledge base (JSON array of entities), overrides `search.knowledge_base`
    #[arg(long)]
    pub kb: Option<PathBuf>,

    /// Language of the document, e.g. "en"
    #[arg(short, long)]
    pub language: Option<String>,

    /// How redirects are handled: ignore, add or follow
    #[arg(long)]
    pub redirect_mode: Option<RedirectMode>,

    /// Maximum number of suggestions per linked entity
    #[arg(long)]
    pub max_suggestions: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Run the link command.
pub async fn run(args: LinkArgs, ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    let config = loaded.config;

    let text_config = config.text_processing.to_text_processing_config()?;
    let mut linker_config = config.linker.to_linker_config()?;
    if let Some(mode) = args.redirect_mode {
        linker_config = linker_config.with_redirect_mode(mode);
    }
    if let Some(max) = args.max_suggestions {
        linker_config = linker_config.with_max_suggestions(max);
    }

    let kb = args
        .kb
        .or_else(|| config.search.knowledge_base.clone())
        .ok_or_else(|| anyhow!("no knowledge base given: pass --kb or set search.knowledge_base"))?;
    let tokenizer = config.search.tokenizer()?;
    let searcher = InMemorySearcher::load(&kb, config.search.field_mapping(), tokenizer.clone())
        .with_context(|| format!("failed to load knowledge base {}", kb.display()))?;

    let content = std::fs::read_to_string(&args.document)
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let document: AnalysedText = serde_json::from_str(&content)
        .with_context(|| format!("invalid document {}", args.document.display()))?;

    let linker = EntityLinker::new(Arc::new(searcher), tokenizer, text_config, linker_config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = linker
        .process_with_cancellation(&document, args.language.as_deref(), cancel)
        .await?;

    for failure in &result.report.failures {
        warn!(%failure, "Soft failure");
    }
    info!(report = %result.report, "Linking finished");

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");
    Ok(())
}
