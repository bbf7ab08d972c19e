//! Export settings shared by the request builder, the assembler and the exporter.

use std::path::PathBuf;

/// Default recursion depth for example body synthesis
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Postman collection format the document declares
pub const POSTMAN_SCHEMA_URL: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Settings for one export run.
///
/// Every value has a default matching the conventional Postman layout, so
/// `ExportConfig::default()` is a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Collection display name (`info.name`)
    pub collection_name: String,
    /// Postman variable standing in for the server origin
    pub base_url: String,
    /// Path prefix the REST routes are mounted under
    pub api_prefix: String,
    /// Placeholder written into bearer auth blocks
    pub token_placeholder: String,
    /// Directory the collection file is written into
    pub output_dir: PathBuf,
    /// Name of the collection file
    pub file_name: String,
    /// Maximum nesting depth for synthesized request bodies
    pub max_depth: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            collection_name: "REST APIs".to_string(),
            base_url: "{{baseUrl}}".to_string(),
            api_prefix: "rest".to_string(),
            token_placeholder: "{{token}}".to_string(),
            output_dir: PathBuf::from("var"),
            file_name: "rest-api-postman.json".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ExportConfig {
    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Full path of the collection file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}
