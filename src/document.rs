//! Shared vocabulary for working on a Swagger document held as a [`serde_json::Value`].
//!
//! The preprocessor keeps the document untyped so that every field it does not
//! know about passes through to the template untouched. This module names the
//! keys it does care about and the set of method tokens a path item may carry.

use serde_json::{Map, Value};
use std::fmt;

/// Top-level key holding the path items.
pub const PATHS: &str = "paths";
/// Top-level key holding the model definitions.
pub const DEFINITIONS: &str = "definitions";
/// Top-level key holding the tag list.
pub const TAGS: &str = "tags";
/// Top-level key holding the API metadata.
pub const INFO: &str = "info";
/// Key under which the originating spec location is stamped.
pub const SPEC_PATH: &str = "x-spec-path";
/// Vendor extension carrying the documentation parts.
pub const GATEWAY_DOCUMENTATION: &str = "x-amazon-apigateway-documentation";
/// List of documentation parts, under the vendor extension or at top level.
pub const DOCUMENTATION_PARTS: &str = "documentationParts";
/// Flag telling the template to render the tag summary.
pub const SHOW_TAG_SUMMARY: &str = "showTagSummary";
/// Base name of the configured logo file.
pub const LOGO: &str = "logo";

/// Operation key holding the extracted body parameter.
pub const REQUEST_BODY: &str = "requestBody";
/// Operation flag telling the template to render the request body section.
pub const SHOW_REQUEST_BODY_SECTION: &str = "showRequestBodySection";

/// The tag assigned to operations that declare none.
pub const DEFAULT_TAG: &str = "default";

/// A key a path item may carry that is treated as an operation.
///
/// Anything else found on a path item (shared `parameters`, vendor extensions)
/// is dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    /// A path-level `$ref`, replaced wholesale by the resolver.
    Ref,
}

impl HttpMethod {
    /// Every recognized token, in declaration order.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Ref,
    ];

    /// Parses a path item key. Matching is exact: `GET` is not a method key.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == token)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Ref => "$ref",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one operation inside the working document by path and method.
///
/// Tags hold these instead of copies so that whatever happens to the operation
/// later in the pipeline is what the tag ends up showing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub path: String,
    pub method: HttpMethod,
}

impl OperationKey {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }

    /// Looks the operation up in `document.paths`.
    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        document
            .get(PATHS)?
            .get(&self.path)?
            .get(self.method.as_str())
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.as_str().to_uppercase(), self.path)
    }
}

/// Mutable access to `value[key]` when it is an object.
pub fn object_mut<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Map<String, Value>> {
    value.get_mut(key).and_then(Value::as_object_mut)
}
