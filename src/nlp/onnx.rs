//! BERT-style token classification through ONNX Runtime.
//!
//! Expects a directory holding `model.onnx`, `tokenizer.json` and
//! `labels.json` (a JSON array of tag names indexed by class id, e.g.
//! `["O", "B-ORG", "I-ORG", ...]`). Tags are decoded with the usual BIO
//! scheme and mapped back to byte spans through the tokenizer offsets.

use std::path::Path;

use ndarray::{Array2, CowArray, Ix3};
use ort::{Environment, GraphOptimizationLevel, Session, SessionBuilder, Value};
use tokenizers::Tokenizer;
use tracing::info;

use crate::{
    error::NlpError,
    nlp::{ner::Ner, types::Entity},
};

const BACKEND: &str = "onnx";

pub struct OnnxNer {
    session: Session,
    tokenizer: Tokenizer,
    labels: Vec<String>,
}

impl OnnxNer {
    /// Load the model directory described in the module docs.
    pub fn load(dir: &Path) -> Result<Self, NlpError> {
        let model_path = dir.join("model.onnx");
        let tokenizer_path = dir.join("tokenizer.json");
        let labels_path = dir.join("labels.json");

        let environment = Environment::builder()
            .with_name("legal-lens-ner")
            .build()
            .map_err(|e| NlpError::model_load(&model_path, e))?
            .into_arc();
        let session = SessionBuilder::new(&environment)
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_model_from_file(&model_path))
            .map_err(|e| NlpError::model_load(&model_path, e))?;
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| NlpError::model_load(&tokenizer_path, e))?;
        let raw = std::fs::read_to_string(&labels_path)
            .map_err(|e| NlpError::model_load(&labels_path, e))?;
        let labels: Vec<String> =
            serde_json::from_str(&raw).map_err(|e| NlpError::model_load(&labels_path, e))?;

        info!(dir = %dir.display(), labels = labels.len(), "loaded onnx ner model");
        Ok(Self {
            session,
            tokenizer,
            labels,
        })
    }

    fn tensor(values: Vec<i64>) -> Result<CowArray<'static, i64, ndarray::IxDyn>, NlpError> {
        let len = values.len();
        let array = Array2::from_shape_vec((1, len), values)
            .map_err(|e| NlpError::inference(BACKEND, e))?;
        Ok(CowArray::from(array.into_dyn()))
    }
}

impl Ner for OnnxNer {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn extract(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| NlpError::inference(BACKEND, e))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&v| v as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&v| v as i64)
            .collect();
        let type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&v| v as i64).collect();

        let mut arrays = vec![Self::tensor(ids)?, Self::tensor(mask)?];
        if self.session.inputs.len() > 2 {
            arrays.push(Self::tensor(type_ids)?);
        }
        let inputs = arrays
            .iter()
            .map(|array| Value::from_array(self.session.allocator(), array))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| NlpError::inference(BACKEND, e))?;

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| NlpError::inference(BACKEND, e))?;
        let logits = outputs
            .first()
            .ok_or_else(|| NlpError::invalid_output(BACKEND, "no output tensor"))?
            .try_extract::<f32>()
            .map_err(|e| NlpError::inference(BACKEND, e))?;
        let view = logits.view();
        let logits = view
            .clone()
            .into_dimensionality::<Ix3>()
            .map_err(|e| NlpError::invalid_output(BACKEND, e))?;

        let tags: Vec<&str> = logits
            .outer_iter()
            .next()
            .ok_or_else(|| NlpError::invalid_output(BACKEND, "empty batch"))?
            .outer_iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .fold((0usize, f32::NEG_INFINITY), |acc, (idx, &score)| {
                        if score > acc.1 {
                            (idx, score)
                        } else {
                            acc
                        }
                    })
                    .0;
                self.labels.get(best).map(String::as_str).unwrap_or("O")
            })
            .collect();

        let spans = decode_bio(
            &tags,
            encoding.get_offsets(),
            encoding.get_special_tokens_mask(),
        );
        spans
            .into_iter()
            .map(|(start, end, label)| Entity::from_span(text, start, end, label, BACKEND))
            .collect()
    }
}

/// Collapse per-token BIO tags into `(start, end, label)` byte spans.
pub(crate) fn decode_bio(
    tags: &[&str],
    offsets: &[(usize, usize)],
    special: &[u32],
) -> Vec<(usize, usize, String)> {
    let mut spans: Vec<(usize, usize, String)> = Vec::new();
    let mut open: Option<(usize, usize, String)> = None;

    for (idx, tag) in tags.iter().enumerate() {
        let (Some(&(start, end)), Some(&flag)) = (offsets.get(idx), special.get(idx)) else {
            break;
        };
        if flag == 1 || start == end {
            continue;
        }
        let (prefix, label) = match tag.split_once('-') {
            Some((prefix, label)) => (prefix, label),
            None if *tag == "O" => {
                spans.extend(open.take());
                continue;
            }
            None => ("I", *tag),
        };
        let continues = prefix == "I" && matches!(&open, Some(current) if current.2 == label);
        if continues {
            if let Some(current) = open.as_mut() {
                current.1 = end;
            }
        } else {
            spans.extend(open.take());
            open = Some((start, end, label.to_string()));
        }
    }
    spans.extend(open);
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bio_tags_merge_into_spans() {
        // [CLS] Acme Corp signed on January 5 [SEP]
        let tags = ["O", "B-ORG", "I-ORG", "O", "O", "B-DATE", "I-DATE", "O"];
        let offsets = [
            (0, 0),
            (0, 4),
            (5, 9),
            (10, 16),
            (17, 19),
            (20, 27),
            (28, 29),
            (0, 0),
        ];
        let special = [1, 0, 0, 0, 0, 0, 0, 1];
        let spans = decode_bio(&tags, &offsets, &special);
        assert_eq!(
            spans,
            vec![(0, 9, "ORG".to_string()), (20, 29, "DATE".to_string())]
        );
    }
}
