//! CLI entry-point for printing a document's visible text.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli::InputArgs,
    config::Settings,
    data::html::{self, TextLayout},
};

/// Args for the `text` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let html = args.input.source().load(&settings).await?;
    let text = html::html_to_text(&html, TextLayout::from_block_breaks(settings.html_block_breaks));
    println!("{text}");
    Ok(())
}
