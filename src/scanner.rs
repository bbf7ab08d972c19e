use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects the Rust source files that service and data types are declared in.
///
/// Each root may be a directory, walked recursively, or a single `.rs` file.
/// `target/` and hidden directories are skipped. Files come back sorted by
/// path within each root so introspection sees them in a stable order.
///
/// # Example
///
/// ```no_run
/// use api_inspector::scanner::SourceScanner;
/// use std::path::PathBuf;
///
/// let scanner = SourceScanner::new(vec![PathBuf::from("./src")]);
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.source_files.len());
/// ```
pub struct SourceScanner {
    roots: Vec<PathBuf>,
}

/// Source files found by a scan, plus anything that could not be visited.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub source_files: Vec<PathBuf>,
    /// Messages for entries that were skipped because they were inaccessible
    pub warnings: Vec<String>,
}

impl SourceScanner {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Walks every root.
    ///
    /// # Errors
    ///
    /// Fails if a root does not exist. Problems below a root are recorded as
    /// warnings and the walk continues.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut result = ScanResult::default();

        for root in &self.roots {
            if !root.exists() {
                bail!("Source path does not exist: {}", root.display());
            }
            if root.is_file() {
                if is_rust_file(root) {
                    result.source_files.push(root.clone());
                } else {
                    warn!("Ignoring non-Rust source path: {}", root.display());
                }
                continue;
            }
            Self::walk(root, &mut result);
        }

        debug!(
            "Scan found {} source files ({} warnings)",
            result.source_files.len(),
            result.warnings.len()
        );
        Ok(result)
    }

    fn walk(root: &Path, result: &mut ScanResult) {
        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                !(name.starts_with('.') || (e.file_type().is_dir() && name == "target"))
            });

        for entry in entries {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_rust_file(entry.path()) => {
                    result.source_files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    result.warnings.push(warning);
                }
            }
        }
    }
}

fn is_rust_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("rs")
}
