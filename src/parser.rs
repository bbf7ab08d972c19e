use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Turns Rust source files into `syn` syntax trees for introspection.
///
/// # Example
///
/// ```no_run
/// use api_inspector::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/api/customer.rs")).unwrap();
/// println!("Parsed {} items", parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A parsed source file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Reads and parses one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid Rust.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::parse_source(path, &content)
    }

    /// Parses source text that is already in memory; `path` only labels it.
    pub fn parse_source(path: &Path, content: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parses every file, dropping the ones that fail.
    ///
    /// A service tree with one broken file should still produce a collection,
    /// so failures are logged as warnings and skipped. Types declared only in
    /// a skipped file later resolve as unknown.
    pub fn parse_all(paths: &[PathBuf]) -> Vec<ParsedFile> {
        let parsed: Vec<ParsedFile> = paths
            .iter()
            .filter_map(|path| match Self::parse_file(path) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Skipping {}: {:#}", path.display(), e);
                    None
                }
            })
            .collect();

        debug!("Parsed {} of {} files", parsed.len(), paths.len());
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_service_trait() {
        let temp_dir = TempDir::new().unwrap();
        let code = r#"
            pub trait CustomerRepository {
                fn save(&self, customer: CustomerData) -> CustomerData;
                fn get_by_id(&self, id: i64) -> CustomerData;
            }
        "#;
        let path = write_file(&temp_dir, "repository.rs", code);

        let parsed = AstParser::parse_file(&path).unwrap();

        assert_eq!(parsed.path, path);
        assert_eq!(parsed.syntax_tree.items.len(), 1);
    }

    #[test]
    fn test_parse_invalid_source() {
        let err = AstParser::parse_source(Path::new("broken.rs"), "pub fn broken( {").unwrap_err();
        assert!(err.to_string().contains("Failed to parse Rust syntax"));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = AstParser::parse_file(Path::new("/nonexistent/api.rs")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_parse_all_skips_failures() {
        let temp_dir = TempDir::new().unwrap();
        let good = write_file(&temp_dir, "good.rs", "pub struct Address;");
        let bad = write_file(&temp_dir, "bad.rs", "struct Missing }");
        let also_good = write_file(&temp_dir, "also_good.rs", "pub struct Region;");

        let parsed = AstParser::parse_all(&[good.clone(), bad, also_good.clone()]);

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].path, good);
        assert_eq!(parsed[1].path, also_good);
    }

    #[test]
    fn test_parse_all_empty() {
        assert!(AstParser::parse_all(&[]).is_empty());
    }
}
