use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that escape an export run.
///
/// Per-route and per-type problems (unresolvable types, recursion limits,
/// unparseable source files) are recovered where they happen and never show
/// up here.
#[derive(Debug)]
pub enum Error {
    /// The requested API kind is not one the inspector knows how to export
    UnsupportedRequestKind(String),
    /// The route registry could not be read or decoded
    Registry { path: PathBuf, message: String },
    /// The collection could not be serialized
    Serialization(String),
    /// The output file could not be written
    OutputSink { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::UnsupportedRequestKind(kind) => {
                write!(f, "Invalid type: {}. Only 'rest' is supported for now.", kind)
            }
            Error::Registry { path, message } => {
                write!(f, "Failed to load route registry {}: {}", path.display(), message)
            }
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::OutputSink { path, source } => {
                write!(f, "Failed to write collection to {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OutputSink { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}
