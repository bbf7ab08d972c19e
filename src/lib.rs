//! API Inspector - Postman collections from a REST route registry.
//!
//! Reads a declarative registry of REST routes, works out for each route
//! which version and functional group it belongs to and what authorization
//! it needs, synthesizes an example request body by introspecting the
//! operation's input type, and assembles everything into a Postman v2.1
//! collection grouped by version, then group.
//!
//! # Architecture
//!
//! 1. [`registry`] - Loads route descriptors from YAML/JSON
//! 2. [`scanner`] / [`parser`] - Find and parse Rust sources for introspection
//! 3. [`introspection`] - The [`introspection::TypeDescriptorProvider`] seam
//!    and its implementations
//! 4. [`classifier`] - Version, group, method and ACL label per route
//! 5. [`schema`] - Recursive example-body synthesis with a recursion guard
//! 6. [`request`] - One Postman request item per route
//! 7. [`collection`] - Version/group folder assembly
//! 8. [`exporter`] - Runs the pipeline and writes the collection file
//! 9. [`serializer`] - JSON/YAML rendering and file output
//!
//! # Example Usage
//!
//! ```no_run
//! use api_inspector::{
//!     config::ExportConfig,
//!     exporter::Exporter,
//!     introspection::source::SourceIntrospector,
//!     parser::AstParser,
//!     registry::RouteRegistry,
//!     scanner::SourceScanner,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let registry = RouteRegistry::from_path(Path::new("webapi.yaml")).unwrap();
//!
//! let scan = SourceScanner::new(vec![PathBuf::from("./src")]).scan().unwrap();
//! let parsed = AstParser::parse_all(&scan.source_files);
//! let introspector = SourceIntrospector::new(&parsed);
//!
//! let exporter = Exporter::new(&registry, &introspector, ExportConfig::default());
//! let path = exporter.export().unwrap();
//! println!("Collection written to {}", path.display());
//! ```

pub mod cli;
pub mod config;
pub mod scanner;
pub mod parser;
pub mod registry;
pub mod introspection;
pub mod classifier;
pub mod schema;
pub mod request;
pub mod collection;
pub mod exporter;
pub mod serializer;
pub mod error;
