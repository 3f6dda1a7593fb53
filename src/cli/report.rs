//! Rendering and persistence of analysis results.

use std::{fmt::Write as _, fs::File, path::PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    cli::OutputFormat,
    config::Settings,
    nlp::{Analysis, Clause, Entity, Summary},
};

/// Analysis record as written to `OUTPUTS_DIR`.
#[derive(Debug, Serialize)]
pub struct SavedAnalysis<'a> {
    pub analyzed_at: DateTime<Utc>,
    pub source: String,
    /// Entity counts per label, in first-seen order.
    pub labels: IndexMap<&'a str, usize>,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
}

pub fn label_counts(entities: &[Entity]) -> IndexMap<&str, usize> {
    let mut counts = IndexMap::new();
    for entity in entities {
        *counts.entry(entity.label.as_str()).or_insert(0) += 1;
    }
    counts
}

/// The three listings printed by `analyze`.
pub fn render_analysis(analysis: &Analysis, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json(analysis);
    }
    let mut out = String::new();
    out.push_str("Entities:\n");
    write_entities(&mut out, &analysis.entities);
    out.push_str("\nClauses:\n");
    write_clauses(&mut out, &analysis.clauses);
    out.push_str("\nSummaries:\n");
    write_summaries(&mut out, &analysis.summaries);
    Ok(out)
}

pub fn render_entities(entities: &[Entity], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(entities),
        OutputFormat::Text => {
            let mut out = String::new();
            write_entities(&mut out, entities);
            Ok(out)
        }
    }
}

pub fn render_clauses(clauses: &[Clause], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(clauses),
        OutputFormat::Text => {
            let mut out = String::new();
            write_clauses(&mut out, clauses);
            Ok(out)
        }
    }
}

fn write_entities(out: &mut String, entities: &[Entity]) {
    for entity in entities {
        let _ = writeln!(out, "{entity}");
    }
}

fn write_clauses(out: &mut String, clauses: &[Clause]) {
    for clause in clauses {
        let _ = writeln!(out, "{}", clause.text);
    }
}

fn write_summaries(out: &mut String, summaries: &[Summary]) {
    for summary in summaries {
        let _ = writeln!(out, "{}", summary.text);
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Write `analysis` to `OUTPUTS_DIR/<name>.json` and return the path.
pub fn save(analysis: &Analysis, source: &str, name: &str, settings: &Settings) -> Result<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        bail!("invalid output name `{name}`; use a plain file stem");
    }
    std::fs::create_dir_all(&settings.outputs_dir)
        .with_context(|| format!("creating {}", settings.outputs_dir.display()))?;
    let path = settings.join_output(format!("{name}.json"));
    let record = SavedAnalysis {
        analyzed_at: Utc::now(),
        source: source.to_string(),
        labels: label_counts(&analysis.entities),
        analysis,
    };
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(file, &record)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
