//! Corpus construction: records to embeddable text plus original metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::flatten::flatten;

/// Text submitted to the embedding provider when a record flattens to
/// nothing; providers reject empty inputs.
pub const EMPTY_RECORD_PLACEHOLDER: &str = "(empty record)";

/// One record prepared for embedding: flattened text plus the untouched
/// original record carried through as metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddableDocument {
    /// Flattened `key: value` text submitted to the embedding model.
    pub text: String,
    /// The original record, returned verbatim to callers.
    pub metadata: Value,
}

/// Maps records to embeddable documents, preserving order.
///
/// Records that are not JSON objects cannot be flattened; they are skipped
/// with a warning rather than aborting the batch, so one bad record never
/// takes down the rest of the corpus.
pub fn build_corpus(records: Vec<Value>) -> Vec<EmbeddableDocument> {
    let mut documents = Vec::with_capacity(records.len());
    for (position, record) in records.into_iter().enumerate() {
        if !record.is_object() {
            tracing::warn!(position, "skipping record that is not a JSON object");
            continue;
        }
        let text = document_text(&record);
        documents.push(EmbeddableDocument {
            text,
            metadata: record,
        });
    }
    documents
}

/// Renders one record's flattened text.
///
/// Form submissions conventionally nest their fields under a top-level `data`
/// object, sometimes with a sibling `metadata` object; when present those are
/// flattened in that order. Anything else flattens whole.
fn document_text(record: &Value) -> String {
    let mut pairs = Vec::new();
    match record.get("data").filter(|value| value.is_object()) {
        Some(data) => {
            pairs.extend(flatten(data));
            if let Some(meta) = record.get("metadata").filter(|value| value.is_object()) {
                pairs.extend(flatten(meta));
            }
        }
        None => pairs.extend(flatten(record)),
    }
    let joined = pairs
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join(" ");
    let text = joined.trim();
    if text.is_empty() {
        EMPTY_RECORD_PLACEHOLDER.to_string()
    } else {
        text.to_string()
    }
}
