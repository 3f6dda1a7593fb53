//! Sentence segmentation for English legal prose.

use std::{collections::HashSet, ops::Range};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{config::ClauseGranularity, error::NlpError, nlp::types::Clause};

/// Trait for clause segmentation implementations.
pub trait Segmenter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Clauses of `text` in left-to-right order, indexed from zero.
    fn segment(&self, text: &str) -> Result<Vec<Clause>, NlpError>;
}

/// Abbreviations (lowercase, final dot removed) that do not end a sentence.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "inc", "corp", "co", "ltd", "llc", "l.l.c", "l.p", "n.a", "p.c", "s.a", "plc", "no",
        "nos", "sec", "secs", "art", "arts", "para", "paras", "cl", "sch", "ex", "exh", "p",
        "pp", "vol", "ch", "subd", "mr", "mrs", "ms", "dr", "prof", "hon", "st", "jr", "sr",
        "esq", "messrs", "v", "vs", "etc", "e.g", "i.e", "viz", "cf", "al", "approx", "dept",
        "est", "fig", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct",
        "nov", "dec", "u.s", "u.k", "u.s.a", "e.u", "ave", "blvd", "rd", "ste",
    ]
    .into_iter()
    .collect()
});

static ENUMERATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?(?:\d{1,3}|[a-zA-Z]|[ivxlc]{1,6}|[IVXLC]{1,6})[.)]$").expect("valid regex")
});

static SUBCLAUSE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\((?:[a-z]|[ivx]{1,5}|\d{1,2})\)\s").expect("valid regex"));

const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201d}', '\u{2019}'];
const OPENERS: &[char] = &['"', '\'', '(', '[', '\u{201c}', '\u{2018}'];

/// Brackets left open longer than this stop suppressing boundaries.
const MAX_BRACKET_SPAN: usize = 400;

/// Rule-based segmenter. Sentence boundaries are `.`, `!` or `?` followed by
/// whitespace and a capital, digit or opening quote; blank lines also end a
/// sentence. Abbreviations, initials, enumerators and bracketed asides do
/// not.
#[derive(Debug, Clone, Copy)]
pub struct RuleSegmenter {
    granularity: ClauseGranularity,
}

impl RuleSegmenter {
    pub fn new(granularity: ClauseGranularity) -> Self {
        Self { granularity }
    }
}

impl Default for RuleSegmenter {
    fn default() -> Self {
        Self::new(ClauseGranularity::Sentence)
    }
}

impl Segmenter for RuleSegmenter {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn segment(&self, text: &str) -> Result<Vec<Clause>, NlpError> {
        let mut ranges: Vec<Range<usize>> = SentenceScanner::new(text).collect();
        if self.granularity == ClauseGranularity::Enumerated {
            ranges = ranges
                .into_iter()
                .flat_map(|range| split_subclauses(text, range))
                .collect();
        }
        ranges
            .into_iter()
            .enumerate()
            .map(|(index, range)| Clause::from_span(text, index, range.start, range.end, self.name()))
            .collect()
    }
}

/// Iterator over trimmed sentence byte ranges.
#[derive(Debug)]
pub struct SentenceScanner<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> SentenceScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    fn is_boundary(&self, start: usize, terminator_at: usize, terminator: char, end: usize) -> bool {
        let after = &self.text[end..];
        let Some(next) = after.trim_start().chars().next() else {
            return true;
        };
        if !after.starts_with(char::is_whitespace) {
            return false;
        }
        if !(next.is_uppercase() || next.is_ascii_digit() || OPENERS.contains(&next)) {
            return false;
        }
        if terminator == '.' {
            let before = &self.text[start..terminator_at];
            let word = before.split_whitespace().last().unwrap_or("");
            if is_abbreviation(word) {
                return false;
            }
            if ENUMERATOR.is_match(self.text[start..end].trim()) {
                return false;
            }
        }
        true
    }

    fn trimmed(&self, start: usize, end: usize) -> Range<usize> {
        start..start + self.text[start..end].trim_end().len()
    }
}

impl Iterator for SentenceScanner<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let rest = &text[self.position..];
        let start = self.position + (rest.len() - rest.trim_start().len());
        if start >= text.len() {
            self.position = text.len();
            return None;
        }

        let mut depth = 0usize;
        let mut opened_at = start;
        let mut chars = text[start..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            let cursor = start + offset;
            let next = cursor + ch.len_utf8();
            match ch {
                '(' | '[' => {
                    if depth == 0 {
                        opened_at = cursor;
                    }
                    depth += 1;
                }
                ')' | ']' => depth = depth.saturating_sub(1),
                '\n' if is_paragraph_break(text, next) => {
                    self.position = next;
                    return Some(self.trimmed(start, cursor));
                }
                '.' | '!' | '?' => {
                    if depth > 0 && cursor - opened_at > MAX_BRACKET_SPAN {
                        depth = 0;
                    }
                    if depth > 0 {
                        continue;
                    }
                    let end = consume_closers(text, next);
                    if self.is_boundary(start, cursor, ch, end) {
                        self.position = end;
                        return Some(self.trimmed(start, end));
                    }
                }
                _ => {}
            }
        }

        self.position = text.len();
        Some(self.trimmed(start, text.len()))
    }
}

/// True when only horizontal whitespace separates `from` and the next newline.
fn is_paragraph_break(text: &str, from: usize) -> bool {
    for ch in text[from..].chars() {
        match ch {
            '\n' => return true,
            ' ' | '\t' | '\r' => continue,
            _ => return false,
        }
    }
    false
}

/// Skip trailing terminators and closing quotes/brackets after a terminator.
fn consume_closers(text: &str, mut end: usize) -> usize {
    for ch in text[end..].chars() {
        if matches!(ch, '.' | '!' | '?') || CLOSERS.contains(&ch) {
            end += ch.len_utf8();
        } else {
            break;
        }
    }
    end
}

fn is_abbreviation(word: &str) -> bool {
    let word = word.trim_start_matches(OPENERS);
    if word.is_empty() {
        return false;
    }
    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(lower.as_str()) {
        return true;
    }
    let mut chars = word.chars();
    if let (Some(first), None) = (chars.next(), chars.next()) {
        // Initials such as the "J" in "J. Smith".
        return first.is_uppercase();
    }
    // Dotted acronyms like "U.S" or "N.Y".
    word.contains('.')
        && word
            .split('.')
            .all(|part| part.chars().count() == 1 && part.chars().all(char::is_alphabetic))
}

/// Cut one sentence range further at semicolons and `(a)`-style enumerators.
fn split_subclauses(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let sentence = &text[range.clone()];
    let mut cuts: Vec<usize> = sentence
        .match_indices(';')
        .map(|(idx, _)| idx + 1)
        .chain(SUBCLAUSE_MARKER.find_iter(sentence).map(|m| m.start() + 1))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut pieces = Vec::new();
    let mut from = 0;
    for cut in cuts.into_iter().chain(std::iter::once(sentence.len())) {
        let piece = &sentence[from..cut];
        let leading = piece.len() - piece.trim_start().len();
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            let start = range.start + from + leading;
            pieces.push(start..start + trimmed.len());
        }
        from = cut;
    }
    pieces
}
