//! Named entity recognition backends.
//!
//! `RuleNer` is always available and needs no model artefacts. It layers a
//! handful of pattern recognizers (money, percentages, dates, statutory
//! references, corporate names, honorific-prefixed people) and resolves
//! overlaps so that spans never nest. The ONNX backend lives in
//! [`crate::nlp::onnx`] behind the `onnx` feature.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{error::NlpError, nlp::types::Entity};

/// Trait for NER implementations.
pub trait Ner: Send + Sync {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    /// Entities in `text`, ordered by start offset.
    fn extract(&self, text: &str) -> Result<Vec<Entity>, NlpError>;
}

const MONTH: &str = r"(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan\.|Feb\.|Mar\.|Apr\.|Jun\.|Jul\.|Aug\.|Sept?\.|Oct\.|Nov\.|Dec\.)";

/// A single pattern recognizer. `group` selects the capture that forms the span.
struct Recognizer {
    label: &'static str,
    pattern: Regex,
    group: usize,
}

impl Recognizer {
    fn new(label: &'static str, pattern: &str, group: usize) -> Self {
        Self {
            label,
            pattern: Regex::new(pattern).expect("valid recognizer regex"),
            group,
        }
    }
}

static RECOGNIZERS: Lazy<Vec<Recognizer>> = Lazy::new(|| {
    vec![
        Recognizer::new(
            "MONEY",
            r"(?:(?:US|USD|EUR|GBP)\s?)?[$€£]\s?\d{1,3}(?:,\d{3})*(?:\.\d+)?(?:\s(?:thousand|million|billion))?|\b\d{1,3}(?:,\d{3})*(?:\.\d+)?(?:\s(?:thousand|million|billion))?\s(?:dollars|euros|pounds|USD|EUR|GBP)\b",
            0,
        ),
        Recognizer::new(
            "PERCENT",
            r"\b\d+(?:\.\d+)?(?:\s?%|\s(?:percent|per\scent)\b)",
            0,
        ),
        Recognizer::new(
            "DATE",
            &format!(
                r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:day\s+of\s+)?{m},?\s+\d{{4}}\b|\b{m}\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b|\b{m}\s+\d{{4}}\b|\b\d{{1,2}}/\d{{1,2}}/\d{{2,4}}\b|\b\d{{4}}-\d{{2}}-\d{{2}}\b",
                m = MONTH
            ),
            0,
        ),
        Recognizer::new(
            "LAW",
            r"(?:\b(?:Section|Article|Clause|Paragraph|Schedule|Exhibit)s?|§§?)\s*\d+(?:\.\d+)*(?:\([a-z0-9]+\))*|\b(?:[A-Z][a-z]+\s+){1,6}Act(?:\s+of\s+\d{4})?\b",
            0,
        ),
        Recognizer::new(
            "ORG",
            r"\b(?:[A-Z][\w&'\-]*\s+){0,5}?[A-Z][\w&'\-]*,?\s+(?:Corp(?:oration)?|Incorporated|Inc|L\.L\.C|LLC|LLP|Ltd|Limited|Company|Co|Group|Holdings|Bank|Partners|PLC|plc|GmbH|AG)\b",
            0,
        ),
        Recognizer::new(
            "PERSON",
            r"\b(?:Mr|Mrs|Ms|Dr|Prof|Hon|Judge|Justice)\.?\s+([A-Z][a-z]+(?:\s+[A-Z]\.)?(?:\s+[A-Z][a-z]+){0,2})",
            1,
        ),
    ]
});

/// Capitalised sentence openers that pattern matches drag into ORG spans.
const LEADING_NOISE: &[&str] = &[
    "A", "All", "An", "Any", "As", "Between", "By", "Each", "For", "If", "In", "On", "Said",
    "Such", "That", "The", "This", "Whereas", "With",
];

/// Pattern-based recognizer. Labels follow the OntoNotes names used by common
/// statistical models.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleNer;

impl RuleNer {
    pub fn new() -> Self {
        Self
    }
}

impl Ner for RuleNer {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn extract(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        let mut candidates: Vec<(usize, usize, usize)> = Vec::new();
        for (priority, recognizer) in RECOGNIZERS.iter().enumerate() {
            for caps in recognizer.pattern.captures_iter(text) {
                let Some(m) = caps.get(recognizer.group) else {
                    continue;
                };
                let (start, end) = if recognizer.label == "ORG" {
                    trim_leading_noise(text, m.start(), m.end())
                } else {
                    (m.start(), m.end())
                };
                if start < end {
                    candidates.push((start, end, priority));
                }
            }
        }

        // Earliest first, then longest, then recognizer order.
        candidates.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| (b.1 - b.0).cmp(&(a.1 - a.0)))
                .then_with(|| a.2.cmp(&b.2))
        });

        let mut entities = Vec::new();
        let mut last_end = 0;
        for (start, end, priority) in candidates {
            if start < last_end {
                continue;
            }
            entities.push(Entity::from_span(
                text,
                start,
                end,
                RECOGNIZERS[priority].label,
                self.name(),
            )?);
            last_end = end;
        }
        Ok(entities)
    }
}

fn trim_leading_noise(text: &str, mut start: usize, end: usize) -> (usize, usize) {
    loop {
        let span = &text[start..end];
        let Some((first, rest)) = span.split_once(char::is_whitespace) else {
            return (start, end);
        };
        if !LEADING_NOISE.contains(&first) {
            return (start, end);
        }
        let skipped = span.len() - rest.trim_start().len();
        start += skipped;
        // A designator on its own is not a name.
        if text[start..end].split_whitespace().count() < 2 {
            return (start, start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(text: &str) -> Vec<(String, String)> {
        RuleNer
            .extract(text)
            .unwrap()
            .into_iter()
            .map(|e| (e.text, e.label))
            .collect()
    }

    #[test]
    fn leading_article_is_dropped_from_org() {
        let found = labels("The Acme Holdings shall pay.");
        assert_eq!(found, vec![("Acme Holdings".into(), "ORG".into())]);
    }

    #[test]
    fn spans_do_not_overlap() {
        let text = "On March 3, 2021 Globex Corp paid $1,250,000 (12.5%) under Section 4.2(b).";
        let entities = RuleNer.extract(text).unwrap();
        for pair in entities.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{pair:?}");
        }
        let found: Vec<_> = entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(found, vec!["DATE", "ORG", "MONEY", "PERCENT", "LAW"]);
    }

    #[test]
    fn person_span_excludes_honorific() {
        let found = labels("Signed by Dr. Jane Smith on behalf of the Seller.");
        assert_eq!(found, vec![("Jane Smith".into(), "PERSON".into())]);
    }
}
