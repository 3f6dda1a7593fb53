//! Runtime configuration utilities for legal-lens.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// NER implementation selected at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NerBackend {
    /// Pattern recognizers, always available.
    Rules,
    /// Token-classification model run through ONNX Runtime.
    Onnx,
}

/// Summarization implementation selected at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryBackend {
    /// Deterministic clause compression, always available.
    Extractive,
    /// Local GGUF model through llama.cpp.
    Llama,
}

/// How finely plain text is cut into clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseGranularity {
    /// One clause per sentence.
    Sentence,
    /// Sentences further split at semicolons and enumerators like `(a)`.
    Enumerated,
}

impl FromStr for NerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" => Ok(Self::Rules),
            "onnx" => Ok(Self::Onnx),
            other => bail!("unknown NER backend `{other}` (expected rules|onnx)"),
        }
    }
}

impl FromStr for SummaryBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extractive" => Ok(Self::Extractive),
            "llama" => Ok(Self::Llama),
            other => bail!("unknown summary backend `{other}` (expected extractive|llama)"),
        }
    }
}

impl FromStr for ClauseGranularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentence" => Ok(Self::Sentence),
            "enumerated" => Ok(Self::Enumerated),
            other => bail!("unknown clause granularity `{other}` (expected sentence|enumerated)"),
        }
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root folder holding model artefacts under `models/`.
    pub data_dir: PathBuf,
    /// Root folder for saved analyses.
    pub outputs_dir: PathBuf,
    pub ner_backend: NerBackend,
    pub summary_backend: SummaryBackend,
    /// Lower bound on summary length, in backend tokens.
    pub summary_min_tokens: usize,
    /// Upper bound on summary length, in backend tokens.
    pub summary_max_tokens: usize,
    /// Clauses summarized at once; 1 keeps summarization sequential.
    pub summary_concurrency: usize,
    pub clause_granularity: ClauseGranularity,
    /// Insert newlines at block element boundaries when flattening HTML.
    pub html_block_breaks: bool,
    pub http_timeout: Duration,
    pub http_user_agent: String,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            outputs_dir: PathBuf::from("./outputs"),
            ner_backend: NerBackend::Rules,
            summary_backend: SummaryBackend::Extractive,
            summary_min_tokens: 30,
            summary_max_tokens: 150,
            summary_concurrency: 4,
            clause_granularity: ClauseGranularity::Sentence,
            html_block_breaks: false,
            http_timeout: Duration::from_secs(30),
            http_user_agent: format!("legal-lens/{}", env!("CARGO_PKG_VERSION")),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load configuration from `.env` and the process environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup, falling back to defaults.
    ///
    /// Values that are present but unparseable are reported rather than ignored.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let settings = Self {
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            outputs_dir: get("OUTPUTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.outputs_dir),
            ner_backend: parse_var(&get, "NER_BACKEND")?.unwrap_or(defaults.ner_backend),
            summary_backend: parse_var(&get, "SUMMARY_BACKEND")?
                .unwrap_or(defaults.summary_backend),
            summary_min_tokens: parse_var(&get, "SUMMARY_MIN_TOKENS")?
                .unwrap_or(defaults.summary_min_tokens),
            summary_max_tokens: parse_var(&get, "SUMMARY_MAX_TOKENS")?
                .unwrap_or(defaults.summary_max_tokens),
            summary_concurrency: parse_var(&get, "SUMMARY_CONCURRENCY")?
                .unwrap_or(defaults.summary_concurrency),
            clause_granularity: parse_var(&get, "CLAUSE_GRANULARITY")?
                .unwrap_or(defaults.clause_granularity),
            html_block_breaks: parse_var(&get, "HTML_BLOCK_BREAKS")?
                .unwrap_or(defaults.html_block_breaks),
            http_timeout: parse_var::<u64, _>(&get, "HTTP_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            http_user_agent: get("HTTP_USER_AGENT").unwrap_or(defaults.http_user_agent),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.summary_max_tokens == 0 || self.summary_min_tokens > self.summary_max_tokens {
            bail!(
                "SUMMARY_MIN_TOKENS ({}) must not exceed SUMMARY_MAX_TOKENS ({}), and the maximum must be positive",
                self.summary_min_tokens,
                self.summary_max_tokens
            );
        }
        if self.summary_concurrency == 0 {
            bail!("SUMMARY_CONCURRENCY must be at least 1");
        }
        Ok(())
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| anyhow::anyhow!("{err}"))
            .with_context(|| format!("invalid value `{raw}` for {key}")),
        None => Ok(None),
    }
}
