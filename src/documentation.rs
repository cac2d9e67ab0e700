//! Merging API Gateway documentation parts into the document.
//!
//! API Gateway exports descriptions out of band, as a list of parts that each
//! name a location in the API. This module writes those descriptions back into
//! the places the template reads them from: `info.description`, the model
//! definitions, and individual responses.
//!
//! Merging is best effort. A part whose target does not exist (never declared,
//! or pruned earlier) is skipped without error.

use crate::document::{
    object_mut, DEFINITIONS, DOCUMENTATION_PARTS, GATEWAY_DOCUMENTATION, INFO, PATHS,
};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One out-of-band documentation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationPart {
    pub location: Location,
    #[serde(default)]
    pub properties: Properties,
}

/// Where a documentation part applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: LocationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(
        rename = "statusCode",
        default,
        deserialize_with = "status_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<String>,
}

/// Location types understood by the merger. API Gateway defines more
/// (`METHOD`, `QUERY_PARAMETER`, ...); those deserialize as `Other` and are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationKind {
    Api,
    Model,
    Response,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DocumentationPart {
    fn description(&self) -> Option<&str> {
        self.properties.description.as_deref()
    }

    /// The description, if it is worth writing into a model or response.
    fn non_empty_description(&self) -> Option<&str> {
        self.description().filter(|d| !d.is_empty())
    }
}

/// Status codes are strings in the export but tolerated as numbers.
fn status_code<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(code)) => Some(code),
        Some(Value::Number(code)) => Some(code.to_string()),
        _ => None,
    })
}

/// Collects the documentation parts carried by the document.
///
/// Parts are read from `x-amazon-apigateway-documentation.documentationParts`
/// followed by a top-level `documentationParts`. Entries that do not parse are
/// skipped.
pub fn documentation_parts(document: &Value) -> Vec<DocumentationPart> {
    let sources = [
        document
            .get(GATEWAY_DOCUMENTATION)
            .and_then(|doc| doc.get(DOCUMENTATION_PARTS)),
        document.get(DOCUMENTATION_PARTS),
    ];

    sources
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|entry| match DocumentationPart::deserialize(entry) {
            Ok(part) => Some(part),
            Err(e) => {
                debug!("Skipping malformed documentation part: {}", e);
                None
            }
        })
        .collect()
}

/// Applies every documentation part found in the document, in order.
///
/// Returns how many parts changed something. Applying the same parts again
/// leaves the document as it is.
pub fn merge_documentation(document: &mut Value) -> usize {
    let parts = documentation_parts(document);
    debug!("Merging {} documentation part(s)", parts.len());
    parts
        .iter()
        .filter(|part| apply_part(document, part))
        .count()
}

/// Applies one part. Returns whether a description was written.
pub fn apply_part(document: &mut Value, part: &DocumentationPart) -> bool {
    match part.location.kind {
        LocationKind::Api => apply_api(document, part),
        LocationKind::Model => apply_description(model_mut(document, &part.location), part),
        LocationKind::Response => apply_description(response_mut(document, &part.location), part),
        LocationKind::Other => false,
    }
}

fn apply_api(document: &mut Value, part: &DocumentationPart) -> bool {
    let Some(root) = document.as_object_mut() else {
        return false;
    };
    let info = root
        .entry(INFO)
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(info) = info.as_object_mut() else {
        return false;
    };
    // A part without a description clears the API description.
    match part.description() {
        Some(description) => {
            info.insert("description".to_string(), Value::String(description.to_string()));
        }
        None => {
            info.shift_remove("description");
        }
    }
    true
}

fn apply_description(target: Option<&mut Map<String, Value>>, part: &DocumentationPart) -> bool {
    match (target, part.non_empty_description()) {
        (Some(target), Some(description)) => {
            target.insert("description".to_string(), Value::String(description.to_string()));
            true
        }
        _ => false,
    }
}

fn model_mut<'a>(document: &'a mut Value, location: &Location) -> Option<&'a mut Map<String, Value>> {
    object_mut(document, DEFINITIONS)?
        .get_mut(location.name.as_deref()?)?
        .as_object_mut()
}

fn response_mut<'a>(
    document: &'a mut Value,
    location: &Location,
) -> Option<&'a mut Map<String, Value>> {
    let method = location.method.as_deref()?.to_lowercase();
    object_mut(document, PATHS)?
        .get_mut(location.path.as_deref()?)?
        .get_mut(method.as_str())?
        .get_mut("responses")?
        .get_mut(location.status_code.as_deref()?)?
        .as_object_mut()
}
