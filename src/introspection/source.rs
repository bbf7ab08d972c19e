use super::{
    is_builtin_type_name, short_type_name, Accessor, ParamDescriptor, TypeDescriptorProvider,
    TypeRef,
};
use crate::parser::ParsedFile;
use crate::registry::OperationRef;
use indexmap::IndexMap;
use log::{debug, warn};
use quote::ToTokens;

/// Answers introspection queries from parsed Rust source.
///
/// Indexes, per type:
///
/// - accessors: methods with a `self` receiver and no other parameters,
///   taken from inherent `impl` blocks, `impl Trait for Type` blocks and
///   `trait` definitions
/// - operations: every method or associated function in those same blocks
///
/// Structs and enums without any impl are still known types; they simply
/// have no accessors. Items nested in inline `mod` blocks are keyed by their
/// module path (`v1::Customer`), so same-named types in different modules
/// stay apart.
///
/// Lookups try the qualified name first. Failing that, a short name is
/// accepted when exactly one indexed type carries it, or when exactly one
/// candidate's path is a suffix of the requested path, so the registry may
/// say `crate::api::CustomerRepository` for a type indexed as
/// `CustomerRepository`.
#[derive(Debug, Default)]
pub struct SourceIntrospector {
    accessors: IndexMap<String, Vec<Accessor>>,
    operations: IndexMap<(String, String), Vec<ParamDescriptor>>,
    by_short_name: IndexMap<String, Vec<String>>,
}

impl SourceIntrospector {
    pub fn new(parsed_files: &[ParsedFile]) -> Self {
        let mut introspector = Self::default();
        for parsed_file in parsed_files {
            debug!("Indexing {}", parsed_file.path.display());
            introspector.index_items(&parsed_file.syntax_tree.items, &[]);
        }
        debug!(
            "Indexed {} types and {} operations",
            introspector.accessors.len(),
            introspector.operations.len()
        );
        introspector
    }

    /// Number of types known to the introspector
    pub fn type_count(&self) -> usize {
        self.accessors.len()
    }

    fn index_items(&mut self, items: &[syn::Item], module_path: &[String]) {
        for item in items {
            match item {
                syn::Item::Struct(item_struct) => {
                    self.declare_type(&qualified_name(module_path, &item_struct.ident));
                }
                syn::Item::Enum(item_enum) => {
                    self.declare_type(&qualified_name(module_path, &item_enum.ident));
                }
                syn::Item::Trait(item_trait) => {
                    let owner = qualified_name(module_path, &item_trait.ident);
                    self.declare_type(&owner);
                    for trait_item in &item_trait.items {
                        if let syn::TraitItem::Fn(method) = trait_item {
                            self.index_method(&owner, &method.sig, module_path);
                        }
                    }
                }
                syn::Item::Impl(item_impl) => {
                    let syn::Type::Path(self_ty) = item_impl.self_ty.as_ref() else {
                        warn!("Skipping impl block with unsupported self type");
                        continue;
                    };
                    let owner = qualify_path(module_path, &self_ty.path);
                    self.declare_type(&owner);
                    for impl_item in &item_impl.items {
                        if let syn::ImplItem::Fn(method) = impl_item {
                            self.index_method(&owner, &method.sig, module_path);
                        }
                    }
                }
                syn::Item::Mod(item_mod) => {
                    if let Some((_, nested)) = &item_mod.content {
                        let mut nested_path = module_path.to_vec();
                        nested_path.push(item_mod.ident.to_string());
                        self.index_items(nested, &nested_path);
                    }
                }
                _ => {}
            }
        }
    }

    fn declare_type(&mut self, qualified: &str) {
        if self.accessors.contains_key(qualified) {
            return;
        }
        self.accessors.insert(qualified.to_string(), Vec::new());
        self.by_short_name
            .entry(short_type_name(qualified).to_string())
            .or_default()
            .push(qualified.to_string());
    }

    fn index_method(&mut self, owner: &str, sig: &syn::Signature, module_path: &[String]) {
        let member = sig.ident.to_string();
        let scope = TypeScope { owner, module_path };

        let params: Vec<ParamDescriptor> = sig
            .inputs
            .iter()
            .filter_map(|input| match input {
                syn::FnArg::Typed(pat_type) => Some(ParamDescriptor::new(
                    Self::param_name(&pat_type.pat),
                    classify_type(&pat_type.ty, &scope),
                )),
                syn::FnArg::Receiver(_) => None,
            })
            .collect();

        if sig.receiver().is_some() && params.is_empty() {
            let return_type = match &sig.output {
                syn::ReturnType::Default => None,
                syn::ReturnType::Type(_, ty) => classify_type(ty, &scope),
            };
            let accessors = self.accessors.entry(owner.to_string()).or_default();
            if !accessors.iter().any(|a| a.name == member) {
                accessors.push(Accessor::new(member.clone(), return_type));
            }
        }

        self.operations
            .entry((owner.to_string(), member))
            .or_insert(params);
    }

    fn param_name(pat: &syn::Pat) -> String {
        match pat {
            syn::Pat::Ident(pat_ident) => pat_ident.ident.to_string(),
            other => render_type_text(other),
        }
    }

    /// Maps a requested type name onto the qualified key it is indexed under
    fn resolve(&self, type_name: &str) -> Option<&str> {
        let requested = normalize_type_path(type_name);
        if let Some((key, _)) = self.accessors.get_key_value(requested.as_str()) {
            return Some(key.as_str());
        }

        let candidates = self.by_short_name.get(short_type_name(&requested))?;
        if let [only] = candidates.as_slice() {
            return Some(only.as_str());
        }

        let matching: Vec<&str> = candidates
            .iter()
            .map(String::as_str)
            .filter(|candidate| is_path_suffix(candidate, &requested))
            .collect();
        match matching.as_slice() {
            [only] => Some(*only),
            _ => {
                warn!(
                    "Type {} is ambiguous between {}; not resolving it",
                    type_name,
                    candidates.join(", ")
                );
                None
            }
        }
    }
}

impl TypeDescriptorProvider for SourceIntrospector {
    fn list_accessors(&self, type_name: &str) -> Option<Vec<Accessor>> {
        let key = self.resolve(type_name)?;
        self.accessors.get(key).cloned()
    }

    fn list_parameters(&self, operation: &OperationRef) -> Option<Vec<ParamDescriptor>> {
        let owner = self.resolve(&operation.owner)?;
        self.operations
            .get(&(owner.to_string(), operation.member.clone()))
            .cloned()
    }
}

/// Where a type is written: the module it appears in and the type whose
/// body it appears in, for resolving `Self`.
struct TypeScope<'a> {
    owner: &'a str,
    module_path: &'a [String],
}

fn qualified_name(module_path: &[String], ident: &syn::Ident) -> String {
    let mut segments = module_path.to_vec();
    segments.push(ident.to_string());
    segments.join("::")
}

/// Resolves a path written inside `module_path` against the crate root,
/// following `crate`, `self` and `super`.
fn qualify_path(module_path: &[String], path: &syn::Path) -> String {
    let mut segments = if path.leading_colon.is_some() {
        Vec::new()
    } else {
        module_path.to_vec()
    };
    for (i, segment) in path.segments.iter().enumerate() {
        let ident = segment.ident.to_string();
        match ident.as_str() {
            "crate" if i == 0 => segments.clear(),
            "self" => {}
            "super" => {
                segments.pop();
            }
            other => segments.push(other.to_string()),
        }
    }
    segments.join("::")
}

/// `::crate::api::X` and `\Vendor\Api\X` become `api::X` and `Vendor::Api::X`
fn normalize_type_path(type_name: &str) -> String {
    let path = type_name
        .trim()
        .trim_start_matches("::")
        .trim_start_matches('\\')
        .replace('\\', "::");
    match path.strip_prefix("crate::") {
        Some(rest) => rest.to_string(),
        None => path,
    }
}

fn is_path_suffix(candidate: &str, requested: &str) -> bool {
    let candidate: Vec<&str> = candidate.split("::").collect();
    let requested: Vec<&str> = requested.split("::").collect();
    requested.ends_with(&candidate)
}

/// Maps a declared Rust type onto a [`TypeRef`].
///
/// References, `Option`, `Box`, `Rc`, `Arc` and `Cow` are looked through;
/// `Self` becomes the owning type; `impl Trait` and `dyn Trait` become the
/// trait. Unit and `!` count as no type at all. Structured names are
/// qualified against the module the type is written in.
fn classify_type(ty: &syn::Type, scope: &TypeScope<'_>) -> Option<TypeRef> {
    match ty {
        syn::Type::Reference(reference) => classify_type(&reference.elem, scope),
        syn::Type::Paren(paren) => classify_type(&paren.elem, scope),
        syn::Type::Group(group) => classify_type(&group.elem, scope),
        syn::Type::Path(type_path) => {
            let segment = type_path.path.segments.last()?;
            let ident = segment.ident.to_string();

            if matches!(ident.as_str(), "Option" | "Box" | "Rc" | "Arc" | "Cow") {
                if let Some(inner) = first_type_argument(&segment.arguments) {
                    return classify_type(inner, scope);
                }
            }
            if ident == "Self" {
                return Some(TypeRef::Structured(scope.owner.to_string()));
            }
            if is_builtin_type_name(&ident) {
                return Some(TypeRef::Primitive(render_type_text(ty)));
            }
            Some(TypeRef::Structured(qualify_path(
                scope.module_path,
                &type_path.path,
            )))
        }
        syn::Type::ImplTrait(impl_trait) => trait_bound_name(impl_trait.bounds.iter(), scope),
        syn::Type::TraitObject(trait_object) => {
            trait_bound_name(trait_object.bounds.iter(), scope)
        }
        syn::Type::Tuple(tuple) if tuple.elems.is_empty() => None,
        syn::Type::Tuple(_) | syn::Type::Array(_) | syn::Type::Slice(_) => {
            Some(TypeRef::Primitive(render_type_text(ty)))
        }
        _ => None,
    }
}

fn first_type_argument(arguments: &syn::PathArguments) -> Option<&syn::Type> {
    match arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            syn::GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

fn trait_bound_name<'a>(
    mut bounds: impl Iterator<Item = &'a syn::TypeParamBound>,
    scope: &TypeScope<'_>,
) -> Option<TypeRef> {
    bounds.find_map(|bound| match bound {
        syn::TypeParamBound::Trait(trait_bound) => Some(TypeRef::Structured(qualify_path(
            scope.module_path,
            &trait_bound.path,
        ))),
        _ => None,
    })
}

/// Source text of a type with token spacing tidied, e.g. `HashMap<String, i32>`
fn render_type_text(node: &impl ToTokens) -> String {
    let text = node.to_token_stream().to_string();
    let chars: Vec<char> = text.chars().collect();
    let mut rendered = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let glued_to_prev = rendered.chars().last().is_some_and(|p| "<&[(:'".contains(p));
            let glued_to_next = chars.get(i + 1).is_some_and(|n| "<>,[]();:".contains(*n));
            if glued_to_prev || glued_to_next {
                continue;
            }
        }
        rendered.push(c);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AstParser;
    use std::path::Path;

    fn introspector_from_code(code: &str) -> SourceIntrospector {
        let parsed = AstParser::parse_source(Path::new("test.rs"), code).unwrap();
        SourceIntrospector::new(&[parsed])
    }

    #[test]
    fn test_accessors_from_trait() {
        let code = r#"
            pub trait CustomerInterface {
                fn get_id(&self) -> Option<i64>;
                fn get_email(&self) -> &str;
                fn get_address(&self) -> Box<dyn AddressInterface>;
                fn set_email(&mut self, email: String);
            }
        "#;
        let introspector = introspector_from_code(code);

        let accessors = introspector.list_accessors("CustomerInterface").unwrap();
        assert_eq!(accessors.len(), 3);
        assert_eq!(accessors[0].name, "get_id");
        assert_eq!(accessors[0].return_type, Some(TypeRef::Primitive("i64".to_string())));
        assert_eq!(accessors[1].return_type, Some(TypeRef::Primitive("str".to_string())));
        assert_eq!(
            accessors[2].return_type,
            Some(TypeRef::Structured("AddressInterface".to_string()))
        );
    }

    #[test]
    fn test_accessors_from_impl_blocks() {
        let code = r#"
            pub struct Address { street: Vec<String> }

            impl Address {
                pub fn new() -> Self { Address { street: vec![] } }
                pub fn get_street(&self) -> Vec<String> { self.street.clone() }
                pub fn get_line(&self, index: usize) -> Option<String> { None }
                pub fn touch(&self) {}
            }

            impl Describe for Address {
                fn get_label(&self) -> impl Display { "x" }
            }
        "#;
        let introspector = introspector_from_code(code);

        let accessors = introspector.list_accessors("Address").unwrap();
        let names: Vec<&str> = accessors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["get_street", "touch", "get_label"]);
        assert_eq!(
            accessors[0].return_type,
            Some(TypeRef::Primitive("Vec<String>".to_string()))
        );
        assert_eq!(accessors[1].return_type, None);
        assert_eq!(
            accessors[2].return_type,
            Some(TypeRef::Structured("Display".to_string()))
        );
    }

    #[test]
    fn test_self_return_resolves_to_owner() {
        let code = r#"
            pub struct Category;
            impl Category {
                pub fn get_parent(&self) -> Option<Self> { None }
            }
        "#;
        let introspector = introspector_from_code(code);

        let accessors = introspector.list_accessors("Category").unwrap();
        assert_eq!(
            accessors[0].return_type,
            Some(TypeRef::Structured("Category".to_string()))
        );
    }

    #[test]
    fn test_plain_struct_is_known_without_accessors() {
        let introspector = introspector_from_code("pub struct Empty { pub id: u32 }");

        assert_eq!(introspector.list_accessors("Empty"), Some(vec![]));
        assert!(introspector.list_accessors("Missing").is_none());
    }

    #[test]
    fn test_operation_parameters() {
        let code = r#"
            pub trait CartManagement {
                fn add_item(&self, cart_id: i64, item: &CartItem, options: Option<ItemOptions>) -> CartItem;
                fn create(store_id: u32);
            }
        "#;
        let introspector = introspector_from_code(code);

        let params = introspector
            .list_parameters(&OperationRef::new("crate::api::CartManagement", "add_item"))
            .unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].name, "cart_id");
        assert_eq!(params[0].param_type, Some(TypeRef::Primitive("i64".to_string())));
        assert_eq!(params[1].param_type, Some(TypeRef::Structured("CartItem".to_string())));
        assert_eq!(
            params[2].param_type,
            Some(TypeRef::Structured("ItemOptions".to_string()))
        );

        let create = introspector
            .list_parameters(&OperationRef::new("CartManagement", "create"))
            .unwrap();
        assert_eq!(create.len(), 1);
        assert!(introspector
            .list_parameters(&OperationRef::new("CartManagement", "remove"))
            .is_none());
    }

    #[test]
    fn test_nested_modules_are_indexed() {
        let code = r#"
            pub mod api {
                pub mod data {
                    pub trait RegionInterface {
                        fn get_code(&self) -> String;
                    }
                }
            }
        "#;
        let introspector = introspector_from_code(code);

        let accessors = introspector
            .list_accessors("api::data::RegionInterface")
            .unwrap();
        assert_eq!(accessors.len(), 1);
        assert_eq!(introspector.type_count(), 1);
    }

    #[test]
    fn test_rendered_type_names() {
        let code = r#"
            pub trait Inventory {
                fn get_levels(&self) -> std::collections::HashMap<String, Vec<u32>>;
                fn get_sources(&self) -> Vec<Box<dyn SourceInterface>>;
                fn get_pair(&self) -> (i32, String);
            }
        "#;
        let introspector = introspector_from_code(code);
        let accessors = introspector.list_accessors("Inventory").unwrap();

        let names: Vec<TypeRef> = accessors.into_iter().filter_map(|a| a.return_type).collect();
        assert_eq!(
            names,
            vec![
                TypeRef::Primitive("std::collections::HashMap<String, Vec<u32>>".to_string()),
                TypeRef::Primitive("Vec<Box<dyn SourceInterface>>".to_string()),
                TypeRef::Primitive("(i32, String)".to_string()),
            ]
        );
    }

    #[test]
    fn test_unit_return_counts_as_absent() {
        let code = r#"
            pub trait Flag {
                fn get_marker(&self) -> ();
            }
        "#;
        let introspector = introspector_from_code(code);
        assert_eq!(introspector.list_accessors("Flag").unwrap()[0].return_type, None);
    }

    #[test]
    fn test_same_name_in_different_modules_stays_apart() {
        let code = r#"
            mod v1 {
                pub trait Customer {
                    fn get_email(&self) -> String;
                }
                pub trait CustomerRepository {
                    fn save(&self, customer: &dyn Customer) -> bool;
                }
            }
            mod v2 {
                pub trait Customer {
                    fn get_loyalty_points(&self) -> u32;
                }
            }
        "#;
        let introspector = introspector_from_code(code);

        let v1: Vec<String> = introspector
            .list_accessors("v1::Customer")
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(v1, vec!["get_email"]);

        let v2 = introspector.list_accessors("crate::v2::Customer").unwrap();
        assert_eq!(v2.len(), 1);
        assert_eq!(v2[0].name, "get_loyalty_points");

        // a module-relative reference resolves to the sibling type
        let params = introspector
            .list_parameters(&OperationRef::new("CustomerRepository", "save"))
            .unwrap();
        assert_eq!(
            params[0].param_type,
            Some(TypeRef::Structured("v1::Customer".to_string()))
        );
    }

    #[test]
    fn test_ambiguous_short_name_is_not_resolved() {
        let code = r#"
            mod v1 { pub struct Customer; }
            mod v2 { pub struct Customer; }
        "#;
        let introspector = introspector_from_code(code);

        assert_eq!(introspector.type_count(), 2);
        assert!(introspector.list_accessors("Customer").is_none());
        assert_eq!(
            introspector.list_accessors("crate::api::v2::Customer"),
            Some(vec![])
        );
    }

    #[test]
    fn test_super_and_crate_paths_are_followed() {
        let code = r#"
            pub struct Address;
            impl Address {
                pub fn get_city(&self) -> String { String::new() }
            }
            mod sales {
                pub struct Address;
                pub trait Order {
                    fn get_billing(&self) -> super::Address;
                    fn get_shipping(&self) -> crate::sales::Address;
                }
            }
        "#;
        let introspector = introspector_from_code(code);

        let accessors = introspector.list_accessors("sales::Order").unwrap();
        assert_eq!(
            accessors[0].return_type,
            Some(TypeRef::Structured("Address".to_string()))
        );
        assert_eq!(
            accessors[1].return_type,
            Some(TypeRef::Structured("sales::Address".to_string()))
        );
    }
}
