//! Loading catalogue documents from disk.
//!
//! Two layouts are accepted: a single JSON array of objects, or JSON Lines
//! with one object per non-blank line.

use std::{fmt::Display, fs, path::Path};

use serde_json::Value;
use tracing::debug;

use crate::{CatalogDocument, IndexError};

/// Reads and parses a documents file.
pub fn load_documents(path: &Path) -> Result<Vec<CatalogDocument>, IndexError> {
    let text = fs::read_to_string(path)?;
    let documents = parse_documents(&text, path)?;
    debug!(path = %path.display(), count = documents.len(), "loaded documents");
    Ok(documents)
}

/// Parses documents from text; `path` is only used in error messages.
pub fn parse_documents(text: &str, path: &Path) -> Result<Vec<CatalogDocument>, IndexError> {
    if text.trim_start().starts_with('[') {
        let records: Vec<Value> =
            serde_json::from_str(text).map_err(|e| parse_error(path, e.line(), &e))?;
        return records
            .iter()
            .map(|record| to_document(record, path, 1))
            .collect();
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let line_no = index + 1;
            let record: Value =
                serde_json::from_str(line).map_err(|e| parse_error(path, line_no, &e))?;
            to_document(&record, path, line_no)
        })
        .collect()
}

/// Converts one parsed record, rejecting non-objects.
fn to_document(record: &Value, path: &Path, line: usize) -> Result<CatalogDocument, IndexError> {
    match record {
        Value::Object(object) => Ok(CatalogDocument::from_object(object)),
        _ => Err(parse_error(path, line, &"expected a JSON object")),
    }
}

/// Builds a `ParseDocument` error.
fn parse_error(path: &Path, line: usize, message: &dyn Display) -> IndexError {
    IndexError::ParseDocument {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<CatalogDocument>, IndexError> {
        parse_documents(text, Path::new("docs.json"))
    }

    #[test]
    fn json_lines_skip_blank_lines() {
        let docs = parse("{\"name\": \"A\"}\n\n   \n{\"name\": \"B\"}\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].get("name").unwrap(), ["B"]);
    }

    #[test]
    fn json_array_is_accepted() {
        let docs = parse("  [{\"name\": \"A\"}, {\"name\": \"B\", \"active\": false}]").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].get("active").unwrap(), ["false"]);
    }

    #[test]
    fn bad_line_reports_its_number() {
        let err = parse("{\"name\": \"A\"}\n{oops}\n").unwrap_err();
        match err {
            IndexError::ParseDocument { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_object_record_is_rejected() {
        let err = parse("{\"name\": \"A\"}\n42\n").unwrap_err();
        assert!(err.to_string().ends_with("docs.json:2: expected a JSON object"));
    }

    #[test]
    fn empty_file_has_no_documents() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogue.jsonl");
        fs::write(&path, "{\"resource_internal_id\": \"svc-1\"}\n").unwrap();
        let docs = load_documents(&path).unwrap();
        assert_eq!(docs[0].get("resource_internal_id").unwrap(), ["svc-1"]);
    }
}
