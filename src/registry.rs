//! Route registry: the declarative list of exposed REST routes.
//!
//! A registry binds `path + HTTP method` to a service operation and the
//! access-control resources a caller needs. It is loaded from a YAML or JSON
//! file shaped like this:
//!
//! ```yaml
//! routes:
//!   /V1/customers/:id:
//!     GET:
//!       service: { class: CustomerRepository, method: get_by_id }
//!       resources: { Customer::read: {} }
//! types:
//!   CustomerData:
//!     get_id: i64
//!     get_address: AddressData
//! operations:
//!   CustomerRepository:
//!     save:
//!       - { name: customer, type: CustomerData }
//! ```
//!
//! `types` and `operations` are optional and feed a [`TypeTable`] for
//! services whose source code is not available to the inspector.
//!
//! Paths, methods and resources keep file order, so the exported collection
//! follows the order routes were declared in.

use crate::error::{Error, Result};
use crate::introspection::TypeTable;
use indexmap::IndexMap;
use log::{debug, info};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// HTTP methods a route can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    /// Any other verb, kept uppercased
    Other(String),
}

impl HttpMethod {
    /// Uppercase verb as it appears on the wire
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Other(verb) => verb,
        }
    }

    /// Parses a verb case-insensitively; unknown verbs become [`HttpMethod::Other`]
    pub fn from_verb(s: &str) -> Self {
        let verb = s.trim().to_ascii_uppercase();
        match verb.as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => HttpMethod::Other(verb),
        }
    }
}

impl FromStr for HttpMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_verb(s))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the operation serving a route: owning type plus member name.
///
/// Either part may be empty when the registry does not name it; such
/// operations simply resolve to nothing during introspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OperationRef {
    pub owner: String,
    pub member: String,
}

impl OperationRef {
    pub fn new(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: member.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty() || self.member.is_empty()
    }
}

impl fmt::Display for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.member)
    }
}

/// One exposed route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Leading-slash URL template, e.g. `/V1/customers/:id`
    pub path: String,
    pub method: HttpMethod,
    pub operation: OperationRef,
    /// Access-control resource ids in declaration order; empty means anonymous
    pub resources: Vec<String>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, method: HttpMethod, operation: OperationRef) -> Self {
        Self {
            path: path.into(),
            method,
            operation,
            resources: Vec::new(),
        }
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }
}

/// All routes of a service plus any precomputed type information.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: Vec<RouteDescriptor>,
    type_table: TypeTable,
}

/// On-disk shape of a registry file
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    routes: IndexMap<String, IndexMap<String, RouteDefinition>>,
    #[serde(default)]
    types: IndexMap<String, IndexMap<String, Option<String>>>,
    #[serde(default)]
    operations: IndexMap<String, IndexMap<String, Vec<TableParam>>>,
}

#[derive(Debug, Deserialize)]
struct RouteDefinition {
    #[serde(default)]
    service: ServiceBinding,
    #[serde(default)]
    resources: Option<ResourceSet>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceBinding {
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    method: Option<String>,
}

/// Resources may be written as a list of ids or as a map keyed by id
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResourceSet {
    List(Vec<String>),
    Map(IndexMap<String, IgnoredAny>),
}

impl ResourceSet {
    fn into_ids(self) -> Vec<String> {
        match self {
            ResourceSet::List(ids) => ids,
            ResourceSet::Map(map) => map.into_keys().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TableParam {
    name: String,
    #[serde(rename = "type", default)]
    type_name: Option<String>,
}

impl RouteRegistry {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        Self {
            routes,
            type_table: TypeTable::default(),
        }
    }

    pub fn with_type_table(mut self, type_table: TypeTable) -> Self {
        self.type_table = type_table;
        self
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Type information declared inline in the registry file
    pub fn type_table(&self) -> &TypeTable {
        &self.type_table
    }

    /// Loads a registry file, picking the format from its extension.
    ///
    /// `.json` files are read as JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Loading route registry from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| Error::Registry {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str::<RegistryFile>(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<RegistryFile>(&content).map_err(|e| e.to_string())
        };

        let file = parsed.map_err(|message| Error::Registry {
            path: path.to_path_buf(),
            message,
        })?;

        let registry = Self::from_file(file);
        info!("Loaded {} routes", registry.routes.len());
        Ok(registry)
    }

    /// Parses a YAML registry document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(content)?;
        Ok(Self::from_file(file))
    }

    /// Parses a JSON registry document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(content)?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: RegistryFile) -> Self {
        let mut routes = Vec::new();

        for (path, methods) in file.routes {
            for (method, definition) in methods {
                let method = HttpMethod::from_verb(&method);
                let operation = OperationRef::new(
                    definition.service.class.unwrap_or_default(),
                    definition.service.method.unwrap_or_default(),
                );
                let resources = definition
                    .resources
                    .map(ResourceSet::into_ids)
                    .unwrap_or_default();

                debug!("Registered route: {} {} -> {}", method, path, operation);
                routes.push(RouteDescriptor {
                    path: path.clone(),
                    method,
                    operation,
                    resources,
                });
            }
        }

        let mut type_table = TypeTable::new();
        for (type_name, accessors) in file.types {
            let accessors: Vec<(&str, Option<&str>)> = accessors
                .iter()
                .map(|(name, ret)| (name.as_str(), ret.as_deref()))
                .collect();
            type_table = type_table.with_type(&type_name, &accessors);
        }
        for (owner, members) in file.operations {
            for (member, params) in members {
                let params: Vec<(&str, Option<&str>)> = params
                    .iter()
                    .map(|p| (p.name.as_str(), p.type_name.as_deref()))
                    .collect();
                type_table = type_table.with_operation(&owner, &member, &params);
            }
        }

        Self { routes, type_table }
    }
}
