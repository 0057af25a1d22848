//! Query orchestration: corpus, embeddings, index, and result shaping.

use serde_json::Value;

use crate::corpus::build_corpus;
use crate::embedder::{embed_many, Embedder};
use crate::error::SearchError;
use crate::index::VectorIndex;

/// Ranked results are cut to this many entries unless the caller asks for
/// everything.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// One query against a record set.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    /// Free-text query; absent (or blank) selects the unranked fetch-all mode.
    pub query_text: Option<String>,
    /// Search depth; defaults to the full record count.
    pub top_k: Option<usize>,
    /// When set, similarity results are not truncated to the default limit.
    pub fetch_all: bool,
}

/// Runs one request-scoped search pipeline and returns the original records
/// for the retained matches.
///
/// The corpus and index live only for this call; nothing is cached across
/// requests. The provider is invoked in one batched pass for the document
/// texts (split only by its batch size) plus one call for the query text.
/// Callers only ever see original records back, never the flattened
/// projection or the vectors.
pub fn run_query<E: Embedder + ?Sized>(
    embedder: &E,
    records: Vec<Value>,
    spec: &QuerySpec,
) -> Result<Vec<Value>, SearchError> {
    if records.is_empty() {
        return Err(SearchError::EmptyInput(
            "no records found in the supplied record set".to_string(),
        ));
    }
    let record_count = records.len();
    let documents = build_corpus(records);
    if documents.is_empty() {
        // Records arrived but every one was skipped, which is a data problem
        // rather than an empty source.
        return Err(SearchError::MalformedRecord(
            "no record in the set is a JSON object".to_string(),
        ));
    }

    let texts: Vec<&str> = documents.iter().map(|doc| doc.text.as_str()).collect();
    let embeddings = embed_many(embedder, &texts)?;
    let index = VectorIndex::build(documents, embeddings)?;
    tracing::debug!(
        entries = index.len(),
        dimension = index.dimension(),
        "vector index built"
    );

    let query_text = spec
        .query_text
        .as_deref()
        .map(str::trim)
        .filter(|query| !query.is_empty());
    let results = match query_text {
        Some(query) => {
            let query_vector = embed_query(embedder, query)?;
            let k = spec.top_k.unwrap_or(record_count).max(1);
            let mut ranked = index.search(&query_vector, k)?;
            if !spec.fetch_all {
                ranked.truncate(DEFAULT_RESULT_LIMIT);
            }
            ranked
                .into_iter()
                .map(|entry| entry.metadata.clone())
                .collect()
        }
        None => index
            .list_all()
            .map(|entry| entry.metadata.clone())
            .collect(),
    };
    Ok(results)
}

fn embed_query<E: Embedder + ?Sized>(
    embedder: &E,
    query: &str,
) -> Result<Vec<f32>, SearchError> {
    let mut vectors = embedder.embed_batch(&[query])?;
    vectors.pop().ok_or_else(|| {
        SearchError::EmbeddingProvider("provider returned no embedding for the query".to_string())
    })
}
