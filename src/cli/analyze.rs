//! CLI entry-point for the full analysis pipeline.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::{report, InputArgs, OutputFormat},
    config::Settings,
    pipeline,
};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output rendering.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
    /// Also write the JSON record to OUTPUTS_DIR/<NAME>.json.
    #[arg(long, value_name = "NAME")]
    pub save: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let source = args.input.source();
    let html = source.load(&settings).await?;
    let pipeline = pipeline::from_settings(&settings)?;
    let analysis = pipeline.analyze(&html).await?;

    if let Some(name) = &args.save {
        let path = report::save(&analysis, &source.to_string(), name, &settings)?;
        info!(path = %path.display(), "saved analysis");
    }
    print!("{}", report::render_analysis(&analysis, args.format)?);
    Ok(())
}
