//! Typed records produced by the analysis stages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NlpError;

/// Named entity span with byte offsets relative to the plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    /// Adapt a raw `(start, end, label)` backend hit, checking the offsets
    /// against the text it was produced from.
    pub fn from_span(
        source: &str,
        start: usize,
        end: usize,
        label: impl Into<String>,
        backend: &'static str,
    ) -> Result<Self, NlpError> {
        let text = slice_checked(source, start, end, backend)?;
        Ok(Self {
            text: text.to_string(),
            label: label.into(),
            start,
            end,
        })
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.text, self.label)
    }
}

/// One segment of the plain text, usually a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub index: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Clause {
    pub fn from_span(
        source: &str,
        index: usize,
        start: usize,
        end: usize,
        backend: &'static str,
    ) -> Result<Self, NlpError> {
        let text = slice_checked(source, start, end, backend)?;
        Ok(Self {
            index,
            text: text.to_string(),
            start,
            end,
        })
    }
}

/// Summary of the clause at `clause_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub clause_index: usize,
    pub text: String,
    /// Length as counted by the backend that produced it.
    pub token_count: usize,
}

/// Result record of one pipeline invocation.
///
/// `summaries[i]` always summarizes `clauses[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub entities: Vec<Entity>,
    pub clauses: Vec<Clause>,
    pub summaries: Vec<Summary>,
}

/// Inclusive token bounds applied to every summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBounds {
    min: usize,
    max: usize,
}

impl SummaryBounds {
    pub fn new(min: usize, max: usize) -> Result<Self, NlpError> {
        if max == 0 || min > max {
            return Err(NlpError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self { min: 30, max: 150 }
    }
}

fn slice_checked<'a>(
    source: &'a str,
    start: usize,
    end: usize,
    backend: &'static str,
) -> Result<&'a str, NlpError> {
    if start > end {
        return Err(NlpError::invalid_output(
            backend,
            format!("span start {start} is past end {end}"),
        ));
    }
    source.get(start..end).ok_or_else(|| {
        NlpError::invalid_output(
            backend,
            format!(
                "span {start}..{end} is outside the text or splits a character (len {})",
                source.len()
            ),
        )
    })
}
