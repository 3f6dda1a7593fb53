//! Clause summarization backends.

use serde::{Deserialize, Serialize};

use crate::{error::NlpError, nlp::types::SummaryBounds};

/// Text produced by a summarizer together with its length in backend tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryText {
    pub text: String,
    pub token_count: usize,
}

/// Trait for summarization implementations. Calls must be deterministic.
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn summarize(&self, clause: &str, bounds: SummaryBounds) -> Result<SummaryText, NlpError>;
}

/// Deterministic compression: parenthetical asides are dropped, the full
/// clause is used if that leaves fewer than `min` words, and the result is
/// cut at `max` words. Tokens are whitespace-delimited words.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveSummarizer;

impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &'static str {
        "extractive"
    }

    fn summarize(&self, clause: &str, bounds: SummaryBounds) -> Result<SummaryText, NlpError> {
        let stripped = strip_parentheticals(clause);
        let compressed: Vec<&str> = stripped.split_whitespace().collect();
        let words: Vec<&str> = if compressed.len() >= bounds.min() {
            compressed
        } else {
            clause.split_whitespace().collect()
        };

        let kept = &words[..words.len().min(bounds.max())];
        Ok(SummaryText {
            text: kept.join(" "),
            token_count: kept.len(),
        })
    }
}

/// Remove `( ... )` asides together with the whitespace before them.
/// Unbalanced input is returned unchanged.
fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' => {
                if depth == 0 {
                    let kept = out.trim_end().len();
                    out.truncate(kept);
                }
                depth += 1;
            }
            ')' if depth > 0 => depth -= 1,
            ')' => return text.to_string(),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    if depth > 0 {
        return text.to_string();
    }
    out
}

#[cfg(feature = "summaries")]
pub use llama::LlamaSummarizer;

#[cfg(feature = "summaries")]
mod llama {
    use std::{
        path::Path,
        sync::{mpsc, Mutex},
        thread,
    };

    use llama_cpp_rs::{
        options::{ModelOptions, PredictOptions},
        LLama,
    };
    use tracing::{debug, info};

    use super::{SummaryText, Summarizer};
    use crate::{error::NlpError, nlp::types::SummaryBounds};

    const BACKEND: &str = "llama";

    struct Job {
        prompt: String,
        max_tokens: usize,
        reply: mpsc::Sender<Result<String, String>>,
    }

    /// Abstractive summaries from a local GGUF model.
    ///
    /// llama.cpp contexts are not safe to share, so the model lives on one
    /// worker thread and calls queue behind it.
    pub struct LlamaSummarizer {
        jobs: Mutex<mpsc::Sender<Job>>,
    }

    impl LlamaSummarizer {
        pub fn load(path: &Path) -> Result<Self, NlpError> {
            if !path.exists() {
                return Err(NlpError::model_load(path, "model file not found"));
            }
            let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
            let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
            let model_path = path.to_string_lossy().into_owned();

            thread::Builder::new()
                .name("llama-summarizer".into())
                .spawn(move || {
                    let llama = match LLama::new(model_path, &ModelOptions::default()) {
                        Ok(llama) => {
                            let _ = ready_tx.send(Ok(()));
                            llama
                        }
                        Err(err) => {
                            let _ = ready_tx.send(Err(err.to_string()));
                            return;
                        }
                    };
                    for job in jobs_rx {
                        let options = PredictOptions {
                            tokens: job.max_tokens as i32,
                            temperature: 0.0,
                            ..Default::default()
                        };
                        let result = llama.predict(job.prompt, options).map_err(|e| e.to_string());
                        let _ = job.reply.send(result);
                    }
                })
                .map_err(|e| NlpError::model_load(path, e))?;

            ready_rx
                .recv()
                .map_err(|e| NlpError::model_load(path, e))?
                .map_err(|reason| NlpError::model_load(path, reason))?;
            info!(path = %path.display(), "loaded llama summarizer");
            Ok(Self {
                jobs: Mutex::new(jobs_tx),
            })
        }
    }

    impl Summarizer for LlamaSummarizer {
        fn name(&self) -> &'static str {
            BACKEND
        }

        fn summarize(&self, clause: &str, bounds: SummaryBounds) -> Result<SummaryText, NlpError> {
            let prompt = format!(
                "Summarize the following contract clause in plain English using between {min} and {max} words.\n\nClause: {clause}\n\nSummary:",
                min = bounds.min(),
                max = bounds.max(),
            );
            let (reply_tx, reply_rx) = mpsc::channel();
            self.jobs
                .lock()
                .map_err(|_| NlpError::inference(BACKEND, "worker lock poisoned"))?
                .send(Job {
                    prompt,
                    max_tokens: bounds.max(),
                    reply: reply_tx,
                })
                .map_err(|_| NlpError::inference(BACKEND, "worker thread stopped"))?;
            let raw = reply_rx
                .recv()
                .map_err(|_| NlpError::inference(BACKEND, "worker thread stopped"))?
                .map_err(|reason| NlpError::inference(BACKEND, reason))?;

            let words: Vec<&str> = raw.split_whitespace().take(bounds.max()).collect();
            debug!(tokens = words.len(), "llama summary generated");
            Ok(SummaryText {
                text: words.join(" "),
                token_count: words.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parentheticals_are_removed_with_leading_space() {
        assert_eq!(
            strip_parentheticals("The Buyer (the \"Purchaser\"), shall pay."),
            "The Buyer, shall pay."
        );
        assert_eq!(strip_parentheticals("open (never closed"), "open (never closed");
    }

    #[test]
    fn falls_back_to_full_clause_below_minimum() {
        let bounds = SummaryBounds::new(4, 10).unwrap();
        let summary = ExtractiveSummarizer
            .summarize("Pay (net thirty days) now.", bounds)
            .unwrap();
        assert_eq!(summary.text, "Pay (net thirty days) now.");
        assert_eq!(summary.token_count, 5);
    }
}
