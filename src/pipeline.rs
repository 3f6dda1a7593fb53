//! Straight-line analysis pipeline: HTML → text → entities/clauses → summaries.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

use crate::{
    config::Settings,
    data::html::{self, TextLayout},
    nlp::{Analysis, Clause, Entity, Models, Summary, SummaryBounds},
};

/// Knobs that shape a pipeline run independently of the loaded backends.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub bounds: SummaryBounds,
    pub layout: TextLayout,
    /// Upper bound on clauses summarized at once.
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            bounds: SummaryBounds::default(),
            layout: TextLayout::Concatenate,
            concurrency: 1,
        }
    }
}

impl PipelineOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            bounds: SummaryBounds::new(settings.summary_min_tokens, settings.summary_max_tokens)?,
            layout: TextLayout::from_block_breaks(settings.html_block_breaks),
            concurrency: settings.summary_concurrency.max(1),
        })
    }
}

/// Runs the analysis stages over injected backends.
#[derive(Debug, Clone)]
pub struct Pipeline {
    models: Models,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(models: Models, options: PipelineOptions) -> Self {
        Self { models, options }
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Visible text of an HTML document.
    pub fn extract_text(&self, html: &str) -> String {
        html::html_to_text(html, self.options.layout)
    }

    pub fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        self.models
            .ner
            .extract(text)
            .with_context(|| format!("entity extraction ({})", self.models.ner.name()))
    }

    pub fn extract_clauses(&self, text: &str) -> Result<Vec<Clause>> {
        self.models
            .segmenter
            .segment(text)
            .with_context(|| format!("clause extraction ({})", self.models.segmenter.name()))
    }

    /// Summarize one clause. Clauses shorter than the minimum are summarized
    /// as-is rather than rejected.
    pub fn summarize_clause(&self, clause: &Clause) -> Result<Summary> {
        summarize_with(&self.models, clause, self.options.bounds)
    }

    /// Full pipeline on the calling thread, one clause after another.
    #[instrument(skip_all, fields(bytes = html.len()))]
    pub fn analyze_blocking(&self, html: &str) -> Result<Analysis> {
        let text = self.extract_text(html);
        let entities = self.extract_entities(&text)?;
        let clauses = self.extract_clauses(&text)?;
        let summaries = clauses
            .iter()
            .map(|clause| self.summarize_clause(clause))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.finish(entities, clauses, summaries))
    }

    /// Full pipeline with clause summaries fanned out to the blocking pool,
    /// at most `concurrency` at a time. Summaries keep clause order.
    #[instrument(skip_all, fields(bytes = html.len()))]
    pub async fn analyze(&self, html: &str) -> Result<Analysis> {
        let this = self.clone();
        let html = html.to_owned();
        let (entities, clauses) = tokio::task::spawn_blocking(move || {
            let text = this.extract_text(&html);
            Ok::<_, anyhow::Error>((this.extract_entities(&text)?, this.extract_clauses(&text)?))
        })
        .await
        .map_err(|err| anyhow!("extraction task failed: {err}"))??;
        let summaries = self.summarize_all(&clauses).await?;
        Ok(self.finish(entities, clauses, summaries))
    }

    /// Summaries for `clauses`, in the same order.
    pub async fn summarize_all(&self, clauses: &[Clause]) -> Result<Vec<Summary>> {
        let bounds = self.options.bounds;
        stream::iter(clauses.iter().cloned())
            .map(|clause| {
                let models = self.models.clone();
                async move {
                    tokio::task::spawn_blocking(move || summarize_with(&models, &clause, bounds))
                        .await
                        .map_err(|err| anyhow!("summarization task failed: {err}"))?
                }
            })
            .buffered(self.options.concurrency)
            .try_collect()
            .await
    }

    fn finish(
        &self,
        entities: Vec<Entity>,
        clauses: Vec<Clause>,
        summaries: Vec<Summary>,
    ) -> Analysis {
        info!(
            entities = entities.len(),
            clauses = clauses.len(),
            summaries = summaries.len(),
            "analysis complete"
        );
        Analysis {
            entities,
            clauses,
            summaries,
        }
    }
}

fn summarize_with(models: &Models, clause: &Clause, bounds: SummaryBounds) -> Result<Summary> {
    let generated = models
        .summarizer
        .summarize(&clause.text, bounds)
        .with_context(|| {
            format!(
                "summarizing clause {} ({})",
                clause.index,
                models.summarizer.name()
            )
        })?;
    debug!(
        clause = clause.index,
        tokens = generated.token_count,
        "clause summarized"
    );
    Ok(Summary {
        clause_index: clause.index,
        text: generated.text,
        token_count: generated.token_count,
    })
}

/// Build a pipeline from configuration with the configured backends.
pub fn from_settings(settings: &Settings) -> Result<Arc<Pipeline>> {
    let models = crate::nlp::load_models(settings)?;
    let options = PipelineOptions::from_settings(settings)?;
    Ok(Arc::new(Pipeline::new(models, options)))
}
