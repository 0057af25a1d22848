#![warn(missing_docs)]
//! Core library entry points for the formsearch semantic record search.
//!
//! The pipeline flattens arbitrarily nested JSON records into stable text,
//! embeds the text through an injected provider, builds a request-scoped
//! vector index, and serves similarity and fetch-all queries whose results
//! carry the original untouched records.

pub mod corpus;
pub mod embedder;
pub mod error;
pub mod flatten;
pub mod index;
pub mod loader;
pub mod query;

pub use corpus::{build_corpus, EmbeddableDocument, EMPTY_RECORD_PLACEHOLDER};
pub use embedder::openai::OpenAiEmbedder;
pub use embedder::{embed_many, Embedder};
pub use error::SearchError;
pub use flatten::flatten;
pub use index::{IndexedVector, VectorIndex};
pub use loader::load_records;
pub use query::{run_query, QuerySpec, DEFAULT_RESULT_LIMIT};
