//! Request templates: one Postman request item per route.

use crate::classifier::ClassifiedRoute;
use crate::config::ExportConfig;
use crate::introspection::ParamDescriptor;
use crate::schema::{SchemaNode, SchemaSynthesizer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Body placeholder when there is nothing to describe
const EMPTY_BODY: &str = "{}";

/// A named request entry in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    /// `"<METHOD> <path>"`
    pub name: String,
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub header: Vec<Header>,
    pub url: Url,
    /// Present only for routes that require authorization
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auth: Option<Auth>,
    pub body: Body,
    /// Carries the access-control label, e.g. `ACL: anonymous`
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    pub raw: String,
    pub host: Vec<String>,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    #[serde(rename = "type")]
    pub auth_type: String,
    pub bearer: Vec<AuthAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAttribute {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub mode: String,
    /// Pretty-printed JSON example payload
    pub raw: String,
}

impl Auth {
    fn bearer(token: &str) -> Self {
        Self {
            auth_type: "bearer".to_string(),
            bearer: vec![AuthAttribute {
                key: "token".to_string(),
                value: token.to_string(),
                value_type: "string".to_string(),
            }],
        }
    }
}

/// Builds request items from classified routes.
pub struct RequestBuilder<'a> {
    synthesizer: &'a SchemaSynthesizer<'a>,
    config: &'a ExportConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(synthesizer: &'a SchemaSynthesizer<'a>, config: &'a ExportConfig) -> Self {
        Self {
            synthesizer,
            config,
        }
    }

    /// Builds the request item for `route`.
    ///
    /// # Arguments
    ///
    /// * `route` - The classified route
    /// * `params` - The operation's declared parameters, or `None` if the
    ///   operation could not be introspected
    ///
    /// # Returns
    ///
    /// A request item named `"<METHOD> <path>"`. Its body is the example for
    /// the first structured parameter, or `{}` when there is none.
    pub fn build(&self, route: &ClassifiedRoute, params: Option<&[ParamDescriptor]>) -> RequestItem {
        let auth = if route.is_anonymous() {
            None
        } else {
            Some(Auth::bearer(&self.config.token_placeholder))
        };

        RequestItem {
            name: format!("{} {}", route.method, route.path),
            request: Request {
                method: route.method.clone(),
                header: Vec::new(),
                url: self.url(&route.path),
                auth,
                body: Body {
                    mode: "raw".to_string(),
                    raw: self.example_body(route, params.unwrap_or_default()),
                },
                description: format!("ACL: {}", route.acl_label),
            },
        }
    }

    fn url(&self, path: &str) -> Url {
        let prefix = self.config.api_prefix.trim_matches('/');

        let mut segments = Vec::new();
        if !prefix.is_empty() {
            segments.push(prefix.to_string());
        }
        // leading slashes are dropped, every other empty segment is kept
        segments.extend(path.trim_start_matches('/').split('/').map(str::to_string));

        let raw = if prefix.is_empty() {
            format!("{}{}", self.config.base_url, path)
        } else {
            format!("{}/{}{}", self.config.base_url, prefix, path)
        };

        Url {
            raw,
            host: vec![self.config.base_url.clone()],
            path: segments,
        }
    }

    /// Example payload synthesized from the first structured parameter.
    ///
    /// Only that one parameter is represented; further structured parameters
    /// are ignored.
    fn example_body(&self, route: &ClassifiedRoute, params: &[ParamDescriptor]) -> String {
        let Some(body_param) = params
            .iter()
            .find(|p| p.param_type.as_ref().is_some_and(|t| t.is_structured()))
        else {
            return EMPTY_BODY.to_string();
        };

        debug!(
            "Body for {} {} from parameter '{}'",
            route.method, route.path, body_param.name
        );
        let node = self.synthesizer.synthesize(body_param.param_type.as_ref());
        if !matches!(node, SchemaNode::Object(_)) {
            return EMPTY_BODY.to_string();
        }

        serde_json::to_string_pretty(&node).unwrap_or_else(|e| {
            warn!("Could not render example body for {}: {}", route.path, e);
            EMPTY_BODY.to_string()
        })
    }
}
