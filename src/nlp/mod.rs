//! Natural language processing backends and their composition root.

pub mod ner;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod sentences;
pub mod summarize;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    config::{NerBackend, Settings, SummaryBackend},
    error::NlpError,
};

pub use ner::{Ner, RuleNer};
pub use sentences::{RuleSegmenter, Segmenter};
pub use summarize::{ExtractiveSummarizer, Summarizer, SummaryText};
pub use types::{Analysis, Clause, Entity, Summary, SummaryBounds};

/// Backends loaded once at start-up and shared read-only.
#[derive(Clone)]
pub struct Models {
    pub ner: Arc<dyn Ner>,
    pub segmenter: Arc<dyn Segmenter>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl std::fmt::Debug for Models {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Models")
            .field("ner", &self.ner.name())
            .field("segmenter", &self.segmenter.name())
            .field("summarizer", &self.summarizer.name())
            .finish()
    }
}

/// Construct the backends selected in `settings`.
pub fn load_models(settings: &Settings) -> Result<Models> {
    let ner = load_ner(settings).context("loading NER backend")?;
    let summarizer = load_summarizer(settings).context("loading summarization backend")?;
    let segmenter: Arc<dyn Segmenter> = Arc::new(RuleSegmenter::new(settings.clause_granularity));
    let models = Models {
        ner,
        segmenter,
        summarizer,
    };
    info!(?models, "models ready");
    Ok(models)
}

fn load_ner(settings: &Settings) -> Result<Arc<dyn Ner>, NlpError> {
    match settings.ner_backend {
        NerBackend::Rules => Ok(Arc::new(RuleNer::new())),
        #[cfg(feature = "onnx")]
        NerBackend::Onnx => Ok(Arc::new(onnx::OnnxNer::load(
            &settings.join_data("models/ner"),
        )?)),
        #[cfg(not(feature = "onnx"))]
        NerBackend::Onnx => Err(NlpError::BackendUnavailable("onnx")),
    }
}

fn load_summarizer(settings: &Settings) -> Result<Arc<dyn Summarizer>, NlpError> {
    match settings.summary_backend {
        SummaryBackend::Extractive => Ok(Arc::new(ExtractiveSummarizer)),
        #[cfg(feature = "summaries")]
        SummaryBackend::Llama => Ok(Arc::new(summarize::LlamaSummarizer::load(
            &settings.join_data("models/summarizer.gguf"),
        )?)),
        #[cfg(not(feature = "summaries"))]
        SummaryBackend::Llama => Err(NlpError::BackendUnavailable("llama")),
    }
}
