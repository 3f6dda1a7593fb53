//! CLI entry-point for entity extraction.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::{report, InputArgs, OutputFormat},
    config::Settings,
    pipeline,
};

/// Args for the `entities` command.
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
    let entities = pipeline.extract_entities(&text)?;
    info!(labels = ?report::label_counts(&entities), "extracted entities");
    print!("{}", report::render_entities(&entities, args.format)?);
    Ok(())
}
