//! Error types raised at the model backend boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by an NER, segmentation or summarization backend.
#[derive(Debug, Error)]
pub enum NlpError {
    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },
    #[error("{backend} inference failed: {reason}")]
    Inference {
        backend: &'static str,
        reason: String,
    },
    #[error("{backend} returned malformed output: {reason}")]
    InvalidOutput {
        backend: &'static str,
        reason: String,
    },
    #[error("invalid summary bounds: min={min} max={max}")]
    InvalidBounds { min: usize, max: usize },
    #[error("backend `{0}` is not compiled in; rebuild with the matching cargo feature")]
    BackendUnavailable(&'static str),
}

impl NlpError {
    pub fn inference(backend: &'static str, reason: impl ToString) -> Self {
        Self::Inference {
            backend,
            reason: reason.to_string(),
        }
    }

    pub fn invalid_output(backend: &'static str, reason: impl ToString) -> Self {
        Self::InvalidOutput {
            backend,
            reason: reason.to_string(),
        }
    }

    pub fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
