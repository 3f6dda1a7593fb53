//! CLI entry-point for summarizing a single clause.

use anyhow::{bail, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, nlp::Clause, pipeline};

/// Args for the `summarize` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Clause text to summarize.
    #[arg(long)]
    pub clause: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let text = args.clause.trim();
    if text.is_empty() {
        bail!("--clause must not be empty");
    }
    let pipeline = pipeline::from_settings(&settings)?;
    let clause = Clause {
        index: 0,
        text: text.to_string(),
        start: 0,
        end: text.len(),
    };
    let summary = pipeline.summarize_clause(&clause)?;
    info!(tokens = summary.token_count, "generated summary");
    println!("{}", summary.text);
    Ok(())
}
