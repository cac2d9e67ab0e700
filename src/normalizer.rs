//! Path and operation normalization.
//!
//! A single walk over `paths` that reshapes every operation for the template
//! and links it into the [`TagGraph`]:
//!
//! - keys of a path item that are not method tokens are removed;
//! - each operation is stamped with its `path` and `method`;
//! - operations without `tags` get the `default` tag;
//! - the path item's shared parameters are appended to the operation's own,
//!   and any `in: body` parameter is moved out into `requestBody`.

use crate::document::{
    object_mut, HttpMethod, OperationKey, DEFAULT_TAG, PATHS, REQUEST_BODY,
    SHOW_REQUEST_BODY_SECTION, SHOW_TAG_SUMMARY,
};
use crate::tags::TagGraph;
use log::debug;
use serde_json::{Map, Value};

const PARAMETERS: &str = "parameters";

/// Normalizes every path item in place and returns the linked tag graph.
///
/// `showTagSummary` is always set on the document.
pub fn normalize(document: &mut Value) -> TagGraph {
    let mut graph = TagGraph::from_declared(document);

    match object_mut(document, PATHS) {
        Some(paths) => normalize_paths(paths, &mut graph),
        None => debug!("Document has no paths to normalize"),
    }

    let show_summary = graph.show_summary();
    if let Some(root) = document.as_object_mut() {
        root.insert(SHOW_TAG_SUMMARY.to_string(), Value::Bool(show_summary));
    }
    graph
}

fn normalize_paths(paths: &mut Map<String, Value>, graph: &mut TagGraph) {
    for (path_name, item) in paths.iter_mut() {
        let Some(item) = item.as_object_mut() else {
            debug!("Skipping path item {} that is not an object", path_name);
            continue;
        };

        let shared = item
            .get(PARAMETERS)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        item.retain(|key, _| {
            let keep = HttpMethod::from_token(key).is_some();
            if !keep {
                debug!("Dropping non-operation key '{}' from {}", key, path_name);
            }
            keep
        });

        for (token, operation) in item.iter_mut() {
            let Some(method) = HttpMethod::from_token(token) else {
                continue;
            };
            let Some(operation) = operation.as_object_mut() else {
                continue;
            };

            normalize_operation(path_name, method, operation, &shared);

            let key = OperationKey::new(path_name.as_str(), method);
            for tag in operation_tags(operation) {
                graph.link(&tag, key.clone());
            }
        }
    }
}

/// Stamps, defaults tags, and splits the body parameter out of one operation.
pub fn normalize_operation(
    path_name: &str,
    method: HttpMethod,
    operation: &mut Map<String, Value>,
    shared_parameters: &[Value],
) {
    operation.insert("path".to_string(), Value::String(path_name.to_string()));
    operation.insert("method".to_string(), Value::String(method.as_str().to_string()));

    if !operation.get("tags").is_some_and(Value::is_array) {
        operation.insert(
            "tags".to_string(),
            Value::Array(vec![Value::String(DEFAULT_TAG.to_string())]),
        );
    }

    let own = match operation.shift_remove(PARAMETERS) {
        Some(Value::Array(params)) => params,
        _ => Vec::new(),
    };

    // The last body parameter wins, which makes a path-level one override the
    // operation's own.
    let mut request_body = None;
    let mut parameters = Vec::with_capacity(own.len() + shared_parameters.len());
    for param in own.into_iter().chain(shared_parameters.iter().cloned()) {
        if param.get("in").and_then(Value::as_str) == Some("body") {
            request_body = Some(param);
        } else {
            parameters.push(param);
        }
    }

    operation.insert(PARAMETERS.to_string(), Value::Array(parameters));
    operation.insert(
        SHOW_REQUEST_BODY_SECTION.to_string(),
        Value::Bool(request_body.is_some()),
    );
    match request_body {
        Some(body) => {
            operation.insert(REQUEST_BODY.to_string(), body);
        }
        None => {
            operation.shift_remove(REQUEST_BODY);
        }
    }
}

fn operation_tags(operation: &Map<String, Value>) -> Vec<String> {
    operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
