use std::{collections::HashMap, path::PathBuf, time::Duration};

use legal_lens::config::{ClauseGranularity, NerBackend, Settings, SummaryBackend};

fn settings_from(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_environment_is_empty() {
    let settings = settings_from(&[]).unwrap();
    assert_eq!(settings.data_dir, PathBuf::from("./data"));
    assert_eq!(settings.ner_backend, NerBackend::Rules);
    assert_eq!(settings.summary_backend, SummaryBackend::Extractive);
    assert_eq!(settings.summary_min_tokens, 30);
    assert_eq!(settings.summary_max_tokens, 150);
    assert_eq!(settings.clause_granularity, ClauseGranularity::Sentence);
    assert!(!settings.html_block_breaks);
}

#[test]
fn environment_overrides_defaults() {
    let settings = settings_from(&[
        ("DATA_DIR", "/srv/models"),
        ("NER_BACKEND", "ONNX"),
        ("SUMMARY_BACKEND", "llama"),
        ("SUMMARY_MIN_TOKENS", "10"),
        ("SUMMARY_MAX_TOKENS", "60"),
        ("SUMMARY_CONCURRENCY", "8"),
        ("CLAUSE_GRANULARITY", "enumerated"),
        ("HTML_BLOCK_BREAKS", "true"),
        ("HTTP_TIMEOUT_SECS", "5"),
    ])
    .unwrap();
    assert_eq!(settings.join_data("models/ner"), PathBuf::from("/srv/models/models/ner"));
    assert_eq!(settings.ner_backend, NerBackend::Onnx);
    assert_eq!(settings.summary_backend, SummaryBackend::Llama);
    assert_eq!(settings.summary_min_tokens, 10);
    assert_eq!(settings.summary_max_tokens, 60);
    assert_eq!(settings.summary_concurrency, 8);
    assert_eq!(settings.clause_granularity, ClauseGranularity::Enumerated);
    assert!(settings.html_block_breaks);
    assert_eq!(settings.http_timeout, Duration::from_secs(5));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let settings = settings_from(&[("SUMMARY_MAX_TOKENS", "  ")]).unwrap();
    assert_eq!(settings.summary_max_tokens, 150);
}

#[test]
fn malformed_values_are_rejected() {
    let err = settings_from(&[("SUMMARY_MIN_TOKENS", "thirty")]).unwrap_err();
    assert!(format!("{err:#}").contains("SUMMARY_MIN_TOKENS"));
    assert!(settings_from(&[("NER_BACKEND", "spacy")]).is_err());
    assert!(settings_from(&[("SUMMARY_CONCURRENCY", "0")]).is_err());
    assert!(settings_from(&[("SUMMARY_MIN_TOKENS", "200")]).is_err());
}

#[cfg(not(feature = "onnx"))]
#[test]
fn selecting_uncompiled_backend_is_an_error() {
    let settings = settings_from(&[("NER_BACKEND", "onnx")]).unwrap();
    let err = legal_lens::nlp::load_models(&settings).unwrap_err();
    assert!(format!("{err:#}").contains("onnx"));
}
