//! Type introspection: what accessors a type exposes and what parameters an
//! operation takes.
//!
//! Schema synthesis only ever talks to the [`TypeDescriptorProvider`] trait.
//! Two providers ship with the crate:
//!
//! - [`source::SourceIntrospector`] reads Rust source code with `syn`
//! - [`TypeTable`] is a precomputed table, usually declared in the registry file
//!
//! [`ProviderChain`] combines several providers, asking each in turn.

pub mod source;

use crate::registry::OperationRef;
use indexmap::IndexMap;
use log::debug;

/// Declared type of an accessor return value or an operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Builtin type, carried by name (`String`, `i64`, `Vec<String>`, ...)
    Primitive(String),
    /// A named type whose own accessors can be introspected
    Structured(String),
}

impl TypeRef {
    /// Classifies a type name: builtins become [`TypeRef::Primitive`],
    /// everything else [`TypeRef::Structured`].
    pub fn from_name(name: &str) -> Self {
        if is_builtin_type_name(name) {
            TypeRef::Primitive(name.to_string())
        } else {
            TypeRef::Structured(name.to_string())
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, TypeRef::Structured(_))
    }
}

/// A zero-argument member exposing one property of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Member name as declared, e.g. `get_first_name`
    pub name: String,
    /// `None` when the member declares no return type
    pub return_type: Option<TypeRef>,
}

impl Accessor {
    pub fn new(name: impl Into<String>, return_type: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            return_type,
        }
    }
}

/// One declared parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: String,
    /// `None` when the parameter type could not be determined
    pub param_type: Option<TypeRef>,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, param_type: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

/// Source of type metadata for schema synthesis.
///
/// Both methods return `None` when the type or operation is unknown to the
/// provider; callers treat that as "unresolvable" rather than as an error.
pub trait TypeDescriptorProvider {
    /// Zero-argument members of `type_name`, in declaration order
    fn list_accessors(&self, type_name: &str) -> Option<Vec<Accessor>>;

    /// Parameters of `operation`, in declaration order, excluding any receiver
    fn list_parameters(&self, operation: &OperationRef) -> Option<Vec<ParamDescriptor>>;
}

/// Returns true for type names that carry no introspectable structure.
///
/// Covers Rust primitives, std collections and `serde_json::Value`, plus the
/// lowercase scalar names (`string`, `int`, ...) registries commonly use.
pub fn is_builtin_type_name(name: &str) -> bool {
    let head = name.split('<').next().unwrap_or(name).trim();
    let head = short_type_name(head);
    matches!(
        head,
        "String"
            | "str"
            | "bool"
            | "char"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "f32"
            | "f64"
            | "Vec"
            | "VecDeque"
            | "HashMap"
            | "BTreeMap"
            | "HashSet"
            | "BTreeSet"
            | "Value"
            | "string"
            | "int"
            | "integer"
            | "float"
            | "number"
            | "boolean"
            | "array"
            | "mixed"
    )
}

/// Last segment of a qualified type name.
///
/// Accepts both `crate::api::CustomerData` and `Vendor\Api\CustomerData`.
pub fn short_type_name(name: &str) -> &str {
    let name = name.trim().trim_start_matches('\\');
    let after_colons = name.rsplit("::").next().unwrap_or(name);
    after_colons.rsplit('\\').next().unwrap_or(after_colons)
}

/// In-memory type metadata.
///
/// Type names and operation owners are matched exactly first, then by their
/// short name, so a table keyed by `CustomerData` also answers
/// `Vendor\Api\CustomerData`.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: IndexMap<String, Vec<Accessor>>,
    operations: IndexMap<(String, String), Vec<ParamDescriptor>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a type by its accessors: `(member name, return type name)`
    pub fn with_type(mut self, type_name: &str, accessors: &[(&str, Option<&str>)]) -> Self {
        let accessors = accessors
            .iter()
            .map(|(name, ret)| Accessor::new(*name, ret.map(TypeRef::from_name)))
            .collect();
        self.types.insert(type_name.to_string(), accessors);
        self
    }

    /// Declares an operation by its parameters: `(name, type name)`
    pub fn with_operation(
        mut self,
        owner: &str,
        member: &str,
        params: &[(&str, Option<&str>)],
    ) -> Self {
        let params = params
            .iter()
            .map(|(name, ty)| ParamDescriptor::new(*name, ty.map(TypeRef::from_name)))
            .collect();
        self.operations
            .insert((owner.to_string(), member.to_string()), params);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.operations.is_empty()
    }

    fn lookup_type(&self, type_name: &str) -> Option<&Vec<Accessor>> {
        self.types
            .get(type_name)
            .or_else(|| self.types.get(short_type_name(type_name)))
    }
}

impl TypeDescriptorProvider for TypeTable {
    fn list_accessors(&self, type_name: &str) -> Option<Vec<Accessor>> {
        self.lookup_type(type_name).cloned()
    }

    fn list_parameters(&self, operation: &OperationRef) -> Option<Vec<ParamDescriptor>> {
        let exact = (operation.owner.clone(), operation.member.clone());
        let short = (
            short_type_name(&operation.owner).to_string(),
            operation.member.clone(),
        );
        self.operations
            .get(&exact)
            .or_else(|| self.operations.get(&short))
            .cloned()
    }
}

/// Asks each provider in order and returns the first answer.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn TypeDescriptorProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: Box<dyn TypeDescriptorProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl TypeDescriptorProvider for ProviderChain {
    fn list_accessors(&self, type_name: &str) -> Option<Vec<Accessor>> {
        let found = self
            .providers
            .iter()
            .find_map(|p| p.list_accessors(type_name));
        if found.is_none() {
            debug!("No provider knows type {}", type_name);
        }
        found
    }

    fn list_parameters(&self, operation: &OperationRef) -> Option<Vec<ParamDescriptor>> {
        let found = self
            .providers
            .iter()
            .find_map(|p| p.list_parameters(operation));
        if found.is_none() {
            debug!("No provider knows operation {}", operation);
        }
        found
    }
}
