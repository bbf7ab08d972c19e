//! End-to-end export: registry in, collection file out.

use crate::classifier::classify;
use crate::collection::{CollectionAssembler, CollectionDocument};
use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::introspection::TypeDescriptorProvider;
use crate::registry::RouteRegistry;
use crate::request::RequestBuilder;
use crate::schema::{RecursionGuard, SchemaSynthesizer};
use crate::serializer::{serialize_json, write_to_file};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Drives classification, body synthesis and assembly over a whole registry.
///
/// The registry and the type provider are passed in explicitly; nothing is
/// looked up globally.
///
/// # Example
///
/// ```no_run
/// use api_inspector::config::ExportConfig;
/// use api_inspector::exporter::Exporter;
/// use api_inspector::registry::RouteRegistry;
/// use std::path::Path;
///
/// let registry = RouteRegistry::from_path(Path::new("webapi.yaml")).unwrap();
/// let exporter = Exporter::new(&registry, registry.type_table(), ExportConfig::default());
/// let path = exporter.export().unwrap();
/// println!("{}", path.display());
/// ```
pub struct Exporter<'a> {
    registry: &'a RouteRegistry,
    provider: &'a dyn TypeDescriptorProvider,
    config: ExportConfig,
}

impl<'a> Exporter<'a> {
    pub fn new(
        registry: &'a RouteRegistry,
        provider: &'a dyn TypeDescriptorProvider,
        config: ExportConfig,
    ) -> Self {
        Self {
            registry,
            provider,
            config,
        }
    }

    /// Builds the collection in memory.
    pub fn build_collection(&self) -> CollectionDocument {
        let guard = RecursionGuard {
            max_depth: self.config.max_depth,
        };
        let synthesizer = SchemaSynthesizer::new(self.provider, guard);
        let builder = RequestBuilder::new(&synthesizer, &self.config);
        let mut assembler = CollectionAssembler::new(self.config.collection_name.clone());

        for route in self.registry.routes() {
            let classified = classify(route);
            let params = if route.operation.is_empty() {
                None
            } else {
                self.provider.list_parameters(&route.operation)
            };
            if params.is_none() {
                debug!(
                    "No signature for {} ({} {}); using an empty body",
                    route.operation, classified.method, route.path
                );
            }

            let item = builder.build(&classified, params.as_deref());
            assembler.add(&classified, item);
        }

        let document = assembler.build();
        info!(
            "Assembled {} requests in {} version folders",
            document.request_count(),
            document.item.len()
        );
        document
    }

    /// Builds the collection and writes it as JSON to the configured output
    /// file.
    ///
    /// The file lands at [`ExportConfig::output_path`]; parent directories are
    /// created and an existing file is overwritten.
    ///
    /// # Returns
    ///
    /// Returns the absolute, canonicalized path of the written file.
    ///
    /// # Errors
    ///
    /// Fails only if the document cannot be serialized or written.
    pub fn export(&self) -> Result<PathBuf> {
        let document = self.build_collection();
        let content = serialize_json(&document)?;

        let path = self.config.output_path();
        info!("Writing collection to {}", path.display());
        write_to_file(&content, &path)?;

        fs::canonicalize(&path).map_err(|source| Error::OutputSink { path, source })
    }
}
