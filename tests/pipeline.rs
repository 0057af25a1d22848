//! End-to-end pipeline scenarios driven by a deterministic in-process
//! embedder, so the suite never touches a live provider.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use formsearch::{
    run_query, Embedder, OpenAiEmbedder, QuerySpec, SearchError, DEFAULT_RESULT_LIMIT,
};

const DIM: usize = 64;

/// Bag-of-words embedder: hashes lowercase alphanumeric tokens into a fixed
/// number of buckets. Texts sharing tokens with the query score higher
/// cosine similarity, which is all these scenarios need.
struct HashEmbedder;

impl Embedder for HashEmbedder {
    fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, SearchError> {
        Ok(inputs.iter().map(|text| embed_text(text)).collect())
    }
}

fn embed_text(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; DIM];
    for token in text
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
    {
        vector[bucket(&token.to_lowercase())] += 1.0;
    }
    vector
}

fn bucket(token: &str) -> usize {
    // FNV-1a reduced to the vector width.
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIM as u64) as usize
}

#[test]
fn similarity_query_returns_the_matching_record() {
    let records = vec![
        json!({"data": {"name": "John"}}),
        json!({"data": {"name": "Jane"}}),
    ];
    let spec = QuerySpec {
        query_text: Some("John".to_string()),
        top_k: Some(1),
        fetch_all: false,
    };
    let results = run_query(&HashEmbedder, records, &spec).expect("query succeeds");
    assert_eq!(results, vec![json!({"data": {"name": "John"}})]);
}

#[test]
fn empty_record_set_surfaces_as_an_empty_input_error() {
    let spec = QuerySpec {
        query_text: Some("anything".to_string()),
        ..QuerySpec::default()
    };
    let err = run_query(&HashEmbedder, Vec::new(), &spec).expect_err("empty input rejected");
    assert!(matches!(err, SearchError::EmptyInput(_)));
    assert!(err.to_string().contains("no records found"));
}

#[test]
fn absent_query_lists_every_record_exactly_once() {
    let records: Vec<Value> = (0..10)
        .map(|n| json!({"data": {"serial": n, "note": format!("entry {n}")}}))
        .collect();
    let results =
        run_query(&HashEmbedder, records.clone(), &QuerySpec::default()).expect("listing");
    assert_eq!(results, records);
}

#[test]
fn missing_credential_fails_before_any_network_call() {
    let err = OpenAiEmbedder::new(
        String::new(),
        "https://api.openai.com/v1".to_string(),
        "text-embedding-3-small".to_string(),
        None,
        Duration::from_secs(5),
        1,
        32,
    )
    .expect_err("unconfigured provider rejected");
    assert!(matches!(err, SearchError::Configuration(_)));
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}

#[test]
fn truncation_law_holds_for_ranked_queries() {
    for count in [2usize, 5, 9] {
        let records: Vec<Value> = (0..count)
            .map(|n| json!({"data": {"comments": format!("report number {n}")}}))
            .collect();
        let spec = QuerySpec {
            query_text: Some("report".to_string()),
            top_k: None,
            fetch_all: false,
        };
        let results = run_query(&HashEmbedder, records, &spec).expect("query succeeds");
        assert_eq!(results.len(), count.min(DEFAULT_RESULT_LIMIT));
    }
}

#[test]
fn fetch_all_ranked_mode_returns_the_full_record_set() {
    let records: Vec<Value> = (0..9)
        .map(|n| json!({"data": {"comments": format!("report number {n}")}}))
        .collect();
    let spec = QuerySpec {
        query_text: Some("report".to_string()),
        top_k: None,
        fetch_all: true,
    };
    let results = run_query(&HashEmbedder, records.clone(), &spec).expect("query succeeds");
    assert_eq!(results.len(), records.len());
    for record in &records {
        assert_eq!(results.iter().filter(|r| *r == record).count(), 1);
    }
}

#[test]
fn malformed_records_are_skipped_without_aborting_the_batch() {
    let records = vec![
        json!({"data": {"name": "John"}}),
        json!("not an object"),
        json!({"data": {"name": "Jane"}}),
    ];
    let results = run_query(&HashEmbedder, records, &QuerySpec::default()).expect("listing");
    assert_eq!(
        results,
        vec![
            json!({"data": {"name": "John"}}),
            json!({"data": {"name": "Jane"}}),
        ]
    );
}

#[test]
fn results_carry_the_original_record_untouched() {
    let record = json!({
        "_id": "abc123",
        "data": {
            "name": "John",
            "history": [{"step": 1}, {"step": 2}],
            "tags": ["a", "b"]
        },
        "metadata": {"source": "web", "version": 3}
    });
    let spec = QuerySpec {
        query_text: Some("John".to_string()),
        top_k: Some(1),
        fetch_all: false,
    };
    let results = run_query(&HashEmbedder, vec![record.clone()], &spec).expect("query succeeds");
    assert_eq!(results, vec![record]);
}

#[test]
fn empty_records_are_still_indexed_and_listed() {
    let records = vec![json!({}), json!({"data": {"name": "John"}})];
    let results =
        run_query(&HashEmbedder, records.clone(), &QuerySpec::default()).expect("listing");
    assert_eq!(results, records);
}
