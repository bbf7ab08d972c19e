//! Example-value synthesis for request bodies.
//!
//! The synthesizer walks a type's accessor surface through a
//! [`TypeDescriptorProvider`] and builds a [`SchemaNode`] tree: each
//! `get_*` accessor becomes a property, builtin return types become leaves
//! carrying the type name, and structured return types are expanded in turn.

use crate::introspection::{TypeDescriptorProvider, TypeRef};
use crate::config::DEFAULT_MAX_DEPTH;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Leaf used when no type information is available
pub const MIXED: &str = "mixed";

/// Leaf substituted where expansion stops because of the recursion guard
pub const RECURSION_LIMIT: &str = "<recursion-limit>";

/// Prefix identifying accessor members
const ACCESSOR_PREFIX: &str = "get";

/// Example value tree standing in for a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    /// Builtin type name, [`MIXED`] or [`RECURSION_LIMIT`]
    Primitive(String),
    /// Property name to child, in accessor declaration order
    Object(IndexMap<String, SchemaNode>),
}

impl SchemaNode {
    pub fn mixed() -> Self {
        SchemaNode::Primitive(MIXED.to_string())
    }

    pub fn empty_object() -> Self {
        SchemaNode::Object(IndexMap::new())
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, SchemaNode>> {
        match self {
            SchemaNode::Object(properties) => Some(properties),
            SchemaNode::Primitive(_) => None,
        }
    }

    /// Nesting depth; leaves and empty objects are depth 0
    pub fn depth(&self) -> usize {
        match self {
            SchemaNode::Primitive(_) => 0,
            SchemaNode::Object(properties) => properties
                .values()
                .map(|child| child.depth() + 1)
                .max()
                .unwrap_or(0),
        }
    }
}

/// Bounds how far structured types are expanded.
///
/// Expansion stops at `max_depth` nested objects, and whenever a type
/// reappears on the path from the root to the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionGuard {
    pub max_depth: usize,
}

impl Default for RecursionGuard {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Builds example values for types known to a provider.
pub struct SchemaSynthesizer<'a> {
    provider: &'a dyn TypeDescriptorProvider,
    guard: RecursionGuard,
}

impl<'a> SchemaSynthesizer<'a> {
    pub fn new(provider: &'a dyn TypeDescriptorProvider, guard: RecursionGuard) -> Self {
        Self { provider, guard }
    }

    /// Synthesizes an example value for a declared type.
    ///
    /// # Arguments
    ///
    /// * `type_ref` - The declared type, or `None` when nothing was declared
    ///
    /// # Returns
    ///
    /// An object for structured types the provider knows, [`MIXED`] for
    /// absent or unknown types, the type's own name for builtins, and
    /// [`RECURSION_LIMIT`] when the guard stops at the root. Never fails.
    pub fn synthesize(&self, type_ref: Option<&TypeRef>) -> SchemaNode {
        match type_ref {
            None => SchemaNode::mixed(),
            Some(TypeRef::Primitive(name)) => SchemaNode::Primitive(name.clone()),
            Some(TypeRef::Structured(name)) => {
                let mut path = Vec::new();
                self.expand(name, 0, &mut path)
            }
        }
    }

    fn expand(&self, type_name: &str, depth: usize, path: &mut Vec<String>) -> SchemaNode {
        if depth >= self.guard.max_depth {
            debug!("Depth limit {} reached at {}", self.guard.max_depth, type_name);
            return SchemaNode::Primitive(RECURSION_LIMIT.to_string());
        }
        if path.iter().any(|visited| visited == type_name) {
            debug!("Cycle detected at {} (path: {})", type_name, path.join(" -> "));
            return SchemaNode::Primitive(RECURSION_LIMIT.to_string());
        }

        let Some(accessors) = self.provider.list_accessors(type_name) else {
            debug!("Type {} is unresolvable", type_name);
            return SchemaNode::mixed();
        };

        path.push(type_name.to_string());
        let mut properties = IndexMap::new();
        for accessor in accessors {
            let Some(property) = property_name(&accessor.name) else {
                continue;
            };
            let value = match &accessor.return_type {
                None => SchemaNode::mixed(),
                Some(TypeRef::Primitive(name)) => SchemaNode::Primitive(name.clone()),
                Some(TypeRef::Structured(child)) => self.expand(child, depth + 1, path),
            };
            properties.insert(property, value);
        }
        path.pop();

        SchemaNode::Object(properties)
    }
}

/// Property exposed by an accessor, or `None` if `member` is not one.
///
/// `get_first_name` and `getFirstName` map to `first_name` and `firstName`.
pub fn property_name(member: &str) -> Option<String> {
    let rest = member.strip_prefix(ACCESSOR_PREFIX)?;
    let rest = rest.strip_prefix('_').unwrap_or(rest);

    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}
