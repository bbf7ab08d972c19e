//! Route classification: version, functional group and access-control label.

use crate::registry::RouteDescriptor;

/// Label used when a route requires no authorization resources
pub const ANONYMOUS: &str = "anonymous";

/// Version folder for routes that do not start with `/<segment>`
pub const DEFAULT_VERSION: &str = "General";

/// Group folder for routes without a second segment directly after the version
pub const DEFAULT_GROUP: &str = "Misc";

/// A route with the facts the collection is organized by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRoute {
    pub path: String,
    /// First path segment, uppercased
    pub version: String,
    /// Second path segment, case preserved
    pub group: String,
    /// Uppercase HTTP verb
    pub method: String,
    /// Comma-joined resources, or [`ANONYMOUS`]
    pub acl_label: String,
}

impl ClassifiedRoute {
    pub fn is_anonymous(&self) -> bool {
        self.acl_label == ANONYMOUS
    }
}

/// Classifies one route. Never fails: missing segments fall back to
/// [`DEFAULT_VERSION`] and [`DEFAULT_GROUP`].
///
/// The version is the non-empty segment right after the leading `/`, and the
/// group is the non-empty segment right after that. Segments are never
/// skipped, so `/V1//customers` has no group and `//V1` or `V1/customers`
/// have no version.
pub fn classify(route: &RouteDescriptor) -> ClassifiedRoute {
    let (version, group) = version_and_group(&route.path);

    ClassifiedRoute {
        path: route.path.clone(),
        version: version
            .map(str::to_uppercase)
            .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        group: group
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
        method: route.method.as_str().to_uppercase(),
        acl_label: acl_label(&route.resources),
    }
}

fn version_and_group(path: &str) -> (Option<&str>, Option<&str>) {
    let Some(rest) = path.strip_prefix('/') else {
        return (None, None);
    };
    let mut segments = rest.split('/');
    match segments.next().filter(|segment| !segment.is_empty()) {
        Some(version) => (
            Some(version),
            segments.next().filter(|segment| !segment.is_empty()),
        ),
        None => (None, None),
    }
}

/// Normalizes a resource list into its label
pub fn acl_label(resources: &[String]) -> String {
    if resources.is_empty() {
        ANONYMOUS.to_string()
    } else {
        resources.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{HttpMethod, OperationRef};

    fn route(path: &str, method: HttpMethod) -> RouteDescriptor {
        RouteDescriptor::new(path, method, OperationRef::default())
    }

    #[test]
    fn test_version_and_group() {
        let classified = classify(&route("/V1/customers", HttpMethod::Get));

        assert_eq!(classified.version, "V1");
        assert_eq!(classified.group, "customers");
        assert_eq!(classified.method, "GET");
    }

    #[test]
    fn test_version_is_uppercased_group_keeps_case() {
        let classified = classify(&route("/v2/guestCarts/:cartId/items", HttpMethod::Post));

        assert_eq!(classified.version, "V2");
        assert_eq!(classified.group, "guestCarts");
        assert_eq!(classified.method, "POST");
    }

    #[test]
    fn test_single_segment_route() {
        let classified = classify(&route("/widgets", HttpMethod::Get));

        assert_eq!(classified.version, "WIDGETS");
        assert_eq!(classified.group, DEFAULT_GROUP);
    }

    #[test]
    fn test_root_route_uses_defaults() {
        let classified = classify(&route("/", HttpMethod::Get));

        assert_eq!(classified.version, DEFAULT_VERSION);
        assert_eq!(classified.group, DEFAULT_GROUP);
    }

    #[test]
    fn test_empty_segments_are_not_skipped() {
        let doubled = classify(&route("/V1//customers", HttpMethod::Get));
        assert_eq!(doubled.version, "V1");
        assert_eq!(doubled.group, DEFAULT_GROUP);

        let leading = classify(&route("//V1", HttpMethod::Get));
        assert_eq!(leading.version, DEFAULT_VERSION);
        assert_eq!(leading.group, DEFAULT_GROUP);
    }

    #[test]
    fn test_trailing_slash() {
        let classified = classify(&route("/V1/", HttpMethod::Get));

        assert_eq!(classified.version, "V1");
        assert_eq!(classified.group, DEFAULT_GROUP);
    }

    #[test]
    fn test_path_without_leading_slash_uses_defaults() {
        let classified = classify(&route("V1/customers", HttpMethod::Get));

        assert_eq!(classified.version, DEFAULT_VERSION);
        assert_eq!(classified.group, DEFAULT_GROUP);
        assert_eq!(classified.path, "V1/customers");
    }

    #[test]
    fn test_other_verbs_are_uppercase() {
        let classified = classify(&route("/V1/cache", HttpMethod::Other("PURGE".to_string())));
        assert_eq!(classified.method, "PURGE");
    }

    #[test]
    fn test_empty_resources_are_anonymous() {
        let classified = classify(&route("/V1/directory/countries", HttpMethod::Get));

        assert_eq!(classified.acl_label, ANONYMOUS);
        assert!(classified.is_anonymous());
    }

    #[test]
    fn test_resources_joined_in_order() {
        let descriptor = route("/V1/orders", HttpMethod::Post)
            .with_resources(["Sales::create", "Sales::actions", "Customer::self"]);
        let classified = classify(&descriptor);

        assert_eq!(classified.acl_label, "Sales::create,Sales::actions,Customer::self");
        assert!(!classified.is_anonymous());
    }
}
