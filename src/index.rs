//! Request-scoped in-memory vector index with exact cosine ranking.

use serde_json::Value;

use crate::corpus::EmbeddableDocument;
use crate::error::SearchError;

/// One stored entry: embedding vector, source text, original record.
#[derive(Debug, Clone)]
pub struct IndexedVector {
    /// Embedding of `text`.
    pub vector: Vec<f32>,
    /// Flattened text the vector was computed from.
    pub text: String,
    /// Original record handed back to callers.
    pub metadata: Value,
}

/// Exact nearest-neighbor index over one request's records.
///
/// Built fresh per request and dropped with the response; never shared or
/// cached across requests.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<IndexedVector>,
    dimension: usize,
}

impl VectorIndex {
    /// Zips parallel document and embedding sequences into an index.
    ///
    /// Errors when the provider broke its contract: the sequence lengths
    /// differ, or vectors disagree on dimension.
    pub fn build(
        documents: Vec<EmbeddableDocument>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, SearchError> {
        if documents.len() != embeddings.len() {
            return Err(SearchError::EmbeddingProvider(format!(
                "provider returned {} embeddings for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }
        let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
        let mut entries = Vec::with_capacity(documents.len());
        for (document, vector) in documents.into_iter().zip(embeddings) {
            if vector.len() != dimension {
                return Err(SearchError::EmbeddingProvider(format!(
                    "embedding dimension {} does not match index dimension {dimension}",
                    vector.len()
                )));
            }
            entries.push(IndexedVector {
                vector,
                text: document.text,
                metadata: document.metadata,
            });
        }
        Ok(Self { entries, dimension })
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension shared by every stored vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the `k` entries most similar to `query_vector`, best first.
    ///
    /// `k` is clamped to the index size. Ties keep insertion order thanks to
    /// the stable sort. A query vector whose dimension differs from the
    /// stored vectors is a broken provider contract, same as in [`build`].
    ///
    /// [`build`]: VectorIndex::build
    pub fn search(
        &self,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<&IndexedVector>, SearchError> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if query_vector.len() != self.dimension {
            return Err(SearchError::EmbeddingProvider(format!(
                "query embedding dimension {} does not match index dimension {}",
                query_vector.len(),
                self.dimension
            )));
        }
        let mut ranked: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (idx, cosine_similarity(query_vector, &entry.vector)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k.min(self.entries.len()));
        Ok(ranked
            .into_iter()
            .map(|(idx, _)| &self.entries[idx])
            .collect())
    }

    /// Every stored entry in insertion order: the genuine fetch-all listing,
    /// not a ranked approximation.
    pub fn list_all(&self) -> impl Iterator<Item = &IndexedVector> {
        self.entries.iter()
    }
}

/// Cosine similarity of two vectors; zero-magnitude inputs score 0.0 instead
/// of NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
