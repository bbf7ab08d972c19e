//! Rendering collections to text and writing them out.

use crate::collection::CollectionDocument;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Renders a collection as pretty-printed JSON, the format API clients import.
pub fn serialize_json(doc: &CollectionDocument) -> Result<String> {
    debug!("Serializing collection to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Renders a collection as YAML, for reading diffs of the generated output.
pub fn serialize_yaml(doc: &CollectionDocument) -> Result<String> {
    debug!("Serializing collection to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Parses a collection previously produced by [`serialize_json`].
pub fn parse_json(content: &str) -> Result<CollectionDocument> {
    Ok(serde_json::from_str(content)?)
}

/// Writes `content` to `path`, creating parent directories.
///
/// Existing files are overwritten. Any I/O failure is reported as
/// [`Error::OutputSink`].
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing {} bytes to {}", content.len(), path.display());

    let sink_error = |source| Error::OutputSink {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(sink_error)?;
    }
    fs::write(path, content).map_err(sink_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionAssembler;
    use tempfile::TempDir;

    fn empty_document() -> CollectionDocument {
        CollectionAssembler::with_id("Test APIs", "abc-123").build()
    }

    #[test]
    fn test_serialize_json_is_pretty() {
        let json = serialize_json(&empty_document()).unwrap();

        assert!(json.contains("\"_postman_id\": \"abc-123\""));
        assert!(json.lines().count() > 3);
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&empty_document()).unwrap();

        assert!(yaml.contains("name: Test APIs"));
        assert!(yaml.contains("_postman_id: abc-123"));
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = empty_document();
        let parsed = parse_json(&serialize_json(&doc).unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_parse_json_rejects_garbage() {
        assert!(matches!(parse_json("not json"), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_write_creates_directories_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("var").join("nested").join("out.json");

        write_to_file("first", &path).unwrap();
        write_to_file("second", &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_failure_is_output_sink_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let result = write_to_file("{}", &blocker.join("out.json"));

        assert!(matches!(result, Err(Error::OutputSink { .. })));
    }
}
