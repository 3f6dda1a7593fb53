//! CLI entry-point for clause segmentation.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::{report, InputArgs, OutputFormat},
    config::Settings,
    pipeline,
};

/// Args for the `clauses` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let html = args.input.source().load(&settings).await?;
    let pipeline = pipeline::from_settings(&settings)?;
    let text = pipeline.extract_text(&html);
    let clauses = pipeline.extract_clauses(&text)?;
    info!(count = clauses.len(), granularity = ?settings.clause_granularity, "segmented clauses");
    print!("{}", report::render_clauses(&clauses, args.format)?);
    Ok(())
}
