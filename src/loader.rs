//! File-backed record source.
//!
//! The pipeline only requires a finite, in-memory sequence of records; this
//! loader covers the flat-file case. Other sources (databases, message
//! queues) can feed `run_query` directly with their own record vectors.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::SearchError;

/// Loads a record set from a JSON file holding an array of records.
///
/// Missing or unreadable files and non-array payloads surface as
/// configuration errors with stable messages.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Value>, SearchError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|err| {
        SearchError::Configuration(format!(
            "failed to read record file {}: {err}",
            path.display()
        ))
    })?;
    let parsed: Value = serde_json::from_str(&raw).map_err(|err| {
        SearchError::Configuration(format!(
            "record file {} is not valid JSON: {err}",
            path.display()
        ))
    })?;
    match parsed {
        Value::Array(records) => Ok(records),
        _ => Err(SearchError::Configuration(format!(
            "record file {} must contain a JSON array of records",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn loads_an_array_of_records() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"data": {{"name": "John"}}}}, {{"data": {{"name": "Jane"}}}}]"#)
            .expect("write records");
        let records = load_records(file.path()).expect("load succeeds");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], json!({"data": {"name": "John"}}));
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = load_records("/nonexistent/records.json").expect_err("missing file rejected");
        assert!(matches!(err, SearchError::Configuration(_)));
    }

    #[test]
    fn non_array_payload_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"not": "an array"}}"#).expect("write payload");
        let err = load_records(file.path()).expect_err("object payload rejected");
        assert!(matches!(err, SearchError::Configuration(_)));
    }

    #[test]
    fn invalid_json_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json at all").expect("write payload");
        let err = load_records(file.path()).expect_err("garbage rejected");
        assert!(matches!(err, SearchError::Configuration(_)));
    }
}
