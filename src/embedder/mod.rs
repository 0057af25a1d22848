//! Embedding provider seam: the consumed trait plus the OpenAI-backed client.

pub mod openai;

use crate::error::SearchError;

/// A provider that turns text into fixed-dimension vectors.
///
/// One vector per input, same order, and the same dimension for every call on
/// a given instance.
pub trait Embedder {
    /// Embeds a single batch of inputs. Implementations may cap the batch
    /// size; callers with larger corpora should go through [`embed_many`].
    fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, SearchError>;

    /// Largest batch a single `embed_batch` call accepts.
    fn batch_size(&self) -> usize {
        usize::MAX
    }
}

/// Embeds any number of inputs by splitting them into provider-sized batches
/// and concatenating the results in input order.
pub fn embed_many<E: Embedder + ?Sized>(
    embedder: &E,
    inputs: &[&str],
) -> Result<Vec<Vec<f32>>, SearchError> {
    let batch_size = embedder.batch_size().max(1);
    let mut vectors = Vec::with_capacity(inputs.len());
    for chunk in inputs.chunks(batch_size) {
        vectors.extend(embedder.embed_batch(chunk)?);
    }
    Ok(vectors)
}
