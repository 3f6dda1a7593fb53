//! Command-line interface wiring for legal-lens.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::{config::Settings, data::DocumentSource};

pub mod analyze;
pub mod clauses;
pub mod entities;
pub mod report;
pub mod serve;
pub mod summarize;
pub mod text;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Legal document entity, clause and summary extraction", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => analyze::run(args, settings).await,
            Commands::Text(args) => text::run(args, settings).await,
            Commands::Entities(args) => entities::run(args, settings).await,
            Commands::Clauses(args) => clauses::run(args, settings).await,
            Commands::Summarize(args) => summarize::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract entities, clauses and per-clause summaries.
    Analyze(analyze::Args),
    /// Print the visible text of the document.
    Text(text::Args),
    /// List named entities.
    Entities(entities::Args),
    /// List clauses (sentences by default).
    Clauses(clauses::Args),
    /// Summarize a single clause.
    Summarize(summarize::Args),
    /// Serve the JSON API.
    Serve(serve::Args),
}

/// Where to read the HTML document from. Stdin when no flag is given.
#[derive(Debug, Clone, Default, ClapArgs)]
#[group(id = "input", multiple = false)]
pub struct InputArgs {
    /// Read HTML from a local file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Fetch HTML with a single GET request.
    #[arg(long)]
    pub url: Option<String>,
    /// HTML passed directly on the command line.
    #[arg(long)]
    pub html: Option<String>,
}

impl InputArgs {
    pub fn source(&self) -> DocumentSource {
        if let Some(path) = &self.file {
            DocumentSource::File(path.clone())
        } else if let Some(url) = &self.url {
            DocumentSource::Url(url.clone())
        } else if let Some(html) = &self.html {
            DocumentSource::Inline(html.clone())
        } else {
            DocumentSource::Stdin
        }
    }
}

/// Rendering of command output on stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Line-delimited listings.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}
